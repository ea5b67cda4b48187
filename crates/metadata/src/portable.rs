//! The portable file-status record.

use crate::kind::FileKind;

/// Numeric range requested for [`PortableStat::size`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SizeWidth {
    /// 32-bit signed size; larger values wrap.
    #[default]
    Narrow,
    /// 64-bit signed size.
    Wide,
}

impl SizeWidth {
    /// Maps the caller's `wide` flag onto a width.
    #[must_use]
    pub const fn from_wide(wide: bool) -> Self {
        if wide { Self::Wide } else { Self::Narrow }
    }

    /// Returns `true` for [`SizeWidth::Wide`].
    #[must_use]
    pub const fn is_wide(self) -> bool {
        matches!(self, Self::Wide)
    }
}

impl From<bool> for SizeWidth {
    fn from(wide: bool) -> Self {
        Self::from_wide(wide)
    }
}

/// File size in the representation selected by [`SizeWidth`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FileSize {
    /// Size narrowed to `i32` with two's-complement wrapping.
    Narrow(i32),
    /// Full 64-bit size.
    Wide(i64),
}

impl FileSize {
    /// Builds the representation for `width` from a native size.
    #[must_use]
    pub const fn new(size: i64, width: SizeWidth) -> Self {
        match width {
            SizeWidth::Narrow => Self::Narrow(size as i32),
            SizeWidth::Wide => Self::Wide(size),
        }
    }

    /// Returns the stored value widened to `i64`.
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Self::Narrow(size) => size as i64,
            Self::Wide(size) => size,
        }
    }

    /// Returns the width this size was built with.
    #[must_use]
    pub const fn width(self) -> SizeWidth {
        match self {
            Self::Narrow(_) => SizeWidth::Narrow,
            Self::Wide(_) => SizeWidth::Wide,
        }
    }
}

/// Normalized, platform-independent file status.
///
/// The field set and order are fixed; see [`PortableStat::FIELD_NAMES`].
/// Timestamps are seconds since the Unix epoch with the sub-second part folded
/// into the fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortableStat {
    /// Device containing the file.
    pub dev: u64,
    /// Inode number.
    pub ino: u64,
    /// Classified file type.
    pub kind: FileKind,
    /// Permission bits, masked to `0o7777`.
    pub perm: u32,
    /// Hard link count.
    pub nlink: u64,
    /// Owner user id.
    pub uid: u32,
    /// Owner group id.
    pub gid: u32,
    /// Device id for special files.
    pub rdev: u64,
    /// Size in the requested representation.
    pub size: FileSize,
    /// Last access time.
    pub atime: f64,
    /// Last modification time.
    pub mtime: f64,
    /// Last status change time.
    pub ctime: f64,
}

impl PortableStat {
    /// Field names in their stable order.
    pub const FIELD_NAMES: [&'static str; 12] = [
        "dev", "ino", "kind", "perm", "nlink", "uid", "gid", "rdev", "size", "atime", "mtime",
        "ctime",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_size_wraps_like_i32() {
        let size = FileSize::new(i64::from(i32::MAX) + 1, SizeWidth::Narrow);
        assert_eq!(size, FileSize::Narrow(i32::MIN));
        assert_eq!(size.value(), i64::from(i32::MIN));
    }

    #[test]
    fn wide_size_keeps_value() {
        let big = 5 * 1024 * 1024 * 1024_i64;
        let size = FileSize::new(big, SizeWidth::Wide);
        assert_eq!(size.value(), big);
        assert_eq!(size.width(), SizeWidth::Wide);
    }

    #[test]
    fn width_from_flag() {
        assert_eq!(SizeWidth::from(true), SizeWidth::Wide);
        assert_eq!(SizeWidth::from(false), SizeWidth::Narrow);
        assert!(SizeWidth::from_wide(true).is_wide());
    }

    #[test]
    fn field_names_are_unique() {
        let mut names = PortableStat::FIELD_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 12);
    }
}
