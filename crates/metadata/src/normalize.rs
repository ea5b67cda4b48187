//! Conversion of native status records into [`PortableStat`].

use crate::kind::FileKind;
use crate::native::{NativeStat, RawTime};
use crate::portable::{FileSize, PortableStat, SizeWidth};

/// Nanoseconds in one second.
pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Setuid, setgid, sticky, and the nine rwx bits.
pub const PERMISSION_MASK: u32 = 0o7777;

/// Folds a timestamp into floating-point seconds.
///
/// A missing sub-second field contributes exactly zero. Out-of-range
/// nanosecond values are clamped so the fraction stays below one.
#[must_use]
pub fn timestamp_seconds(time: RawTime) -> f64 {
    let fraction = time.nanoseconds.map_or(0.0, |nanos| {
        f64::from(nanos.min(NANOS_PER_SEC - 1)) / f64::from(NANOS_PER_SEC)
    });
    time.seconds as f64 + fraction
}

/// Strips the type bits from `mode`.
#[must_use]
pub const fn permission_bits(mode: u32) -> u32 {
    mode & PERMISSION_MASK
}

/// Builds the portable record for a native status record.
///
/// `width` affects only [`PortableStat::size`].
pub fn normalize<S: NativeStat + ?Sized>(raw: &S, width: SizeWidth) -> PortableStat {
    let mode = raw.mode();
    PortableStat {
        dev: raw.device(),
        ino: raw.inode(),
        kind: FileKind::from_mode(mode),
        perm: permission_bits(mode),
        nlink: raw.link_count(),
        uid: raw.owner(),
        gid: raw.group(),
        rdev: raw.special_device(),
        size: FileSize::new(raw.size(), width),
        atime: timestamp_seconds(raw.accessed()),
        mtime: timestamp_seconds(raw.modified()),
        ctime: timestamp_seconds(raw.changed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::RawStat;

    fn sample() -> RawStat {
        RawStat {
            dev: 0x801,
            ino: 1234,
            mode: 0o104755,
            nlink: 2,
            uid: 1000,
            gid: 100,
            rdev: 0,
            size: 42,
            atime: RawTime::with_nanos(100, 250_000_000),
            mtime: RawTime::whole(200),
            ctime: RawTime::with_nanos(300, 0),
        }
    }

    #[test]
    fn copies_identity_fields() {
        let status = normalize(&sample(), SizeWidth::Narrow);
        assert_eq!(status.dev, 0x801);
        assert_eq!(status.ino, 1234);
        assert_eq!(status.nlink, 2);
        assert_eq!(status.uid, 1000);
        assert_eq!(status.gid, 100);
        assert_eq!(status.rdev, 0);
    }

    #[test]
    fn masks_type_bits_and_keeps_setuid() {
        let status = normalize(&sample(), SizeWidth::Narrow);
        assert_eq!(status.kind, FileKind::Regular);
        assert_eq!(status.perm, 0o4755);
    }

    #[test]
    fn folds_nanoseconds_into_fraction() {
        let status = normalize(&sample(), SizeWidth::Narrow);
        assert_eq!(status.atime, 100.25);
        assert_eq!(status.mtime, 200.0);
        assert_eq!(status.ctime, 300.0);
    }

    #[test]
    fn clamps_out_of_range_nanoseconds() {
        let seconds = timestamp_seconds(RawTime::with_nanos(0, NANOS_PER_SEC + 5));
        assert!(seconds < 1.0);
    }

    #[test]
    fn width_changes_only_size() {
        let raw = sample();
        let narrow = normalize(&raw, SizeWidth::Narrow);
        let wide = normalize(&raw, SizeWidth::Wide);
        assert_eq!(narrow.size, FileSize::Narrow(42));
        assert_eq!(wide.size, FileSize::Wide(42));
        assert_eq!(
            PortableStat {
                size: wide.size,
                ..narrow
            },
            wide
        );
    }

    #[test]
    fn device_record_keeps_rdev() {
        let raw = RawStat {
            mode: 0o020666,
            rdev: 0x0103,
            ..RawStat::default()
        };
        let status = normalize(&raw, SizeWidth::Wide);
        assert_eq!(status.kind, FileKind::CharDevice);
        assert_eq!(status.rdev, 0x0103);
        assert_eq!(status.perm, 0o666);
    }
}
