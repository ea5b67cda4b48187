#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `metadata` defines the portable file-status record produced by the
//! `oc-stat` workspace and the normalizer that builds it from the raw record a
//! `stat`, `lstat`, or `fstat` call leaves behind. Every host reports file
//! status slightly differently: type tags live in the high mode bits, some
//! platforms carry nanosecond timestamps and some do not, and the file size may
//! be wider than the integer a caller wants to hold it in. [`PortableStat`]
//! flattens all of that into one fixed record.
//!
//! # Design
//!
//! - [`NativeStat`] is the read-only view the normalizer needs over a native
//!   record. It is implemented for `libc::stat` on Unix hosts and for the
//!   owned [`RawStat`] snapshot, which tests and non-Unix callers can build by
//!   hand.
//! - [`normalize`] is a pure function. It cannot fail; the raw record is
//!   assumed to come from a successful syscall.
//! - [`FileKind`] classifies the type bits against a fixed ordered table. The
//!   discriminants are a stable public contract because callers serialize
//!   them.
//! - [`SizeWidth`] selects the numeric range of [`PortableStat::size`] and
//!   nothing else.
//!
//! # Invariants
//!
//! - [`PortableStat`] always carries the twelve fields listed in
//!   [`PortableStat::FIELD_NAMES`], in that order.
//! - [`PortableStat::perm`] never contains type bits.
//! - Timestamps are `whole + nanos / 1e9`; the fractional part is zero when the
//!   platform supplies no sub-second value.
//! - Unrecognized type bits classify as [`FileKind::Regular`].
//!
//! # Examples
//!
//! ```
//! use metadata::{FileKind, RawStat, RawTime, SizeWidth, normalize};
//!
//! let raw = RawStat {
//!     mode: 0o040755,
//!     size: 4096,
//!     mtime: RawTime::with_nanos(1_700_000_000, 500_000_000),
//!     ..RawStat::default()
//! };
//!
//! let status = normalize(&raw, SizeWidth::Wide);
//! assert_eq!(status.kind, FileKind::Directory);
//! assert_eq!(status.perm, 0o755);
//! assert_eq!(status.size.value(), 4096);
//! assert_eq!(status.mtime, 1_700_000_000.5);
//! ```

mod kind;
mod native;
mod normalize;
mod portable;

pub use kind::{
    FileKind, S_IFBLK, S_IFCHR, S_IFDIR, S_IFIFO, S_IFLNK, S_IFMT, S_IFREG, S_IFSOCK,
};
pub use native::{NativeStat, RawStat, RawTime};
pub use normalize::{NANOS_PER_SEC, PERMISSION_MASK, normalize, permission_bits, timestamp_seconds};
pub use portable::{FileSize, PortableStat, SizeWidth};
