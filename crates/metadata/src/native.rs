//! Read-only access to native file-status records.

/// One timestamp as reported by the OS.
///
/// `nanoseconds` is `None` when the platform record carries no sub-second
/// field at all, which is distinct from a sub-second value of zero.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct RawTime {
    /// Whole seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second part in nanoseconds, when the platform provides one.
    pub nanoseconds: Option<u32>,
}

impl RawTime {
    /// A timestamp from a platform without sub-second resolution.
    #[must_use]
    pub const fn whole(seconds: i64) -> Self {
        Self {
            seconds,
            nanoseconds: None,
        }
    }

    /// A timestamp with a nanosecond component.
    #[must_use]
    pub const fn with_nanos(seconds: i64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds: Some(nanoseconds),
        }
    }
}

/// Accessors the normalizer reads from a native status record.
///
/// Widths are the widest any supported platform uses, so implementations only
/// ever widen. Implementations must not filter or reinterpret the values;
/// classification and masking belong to [`normalize`](crate::normalize).
pub trait NativeStat {
    /// Device containing the file.
    fn device(&self) -> u64;
    /// Inode number.
    fn inode(&self) -> u64;
    /// Full mode, type bits included.
    fn mode(&self) -> u32;
    /// Hard link count.
    fn link_count(&self) -> u64;
    /// Owner user id.
    fn owner(&self) -> u32;
    /// Owner group id.
    fn group(&self) -> u32;
    /// Device id for character and block special files.
    fn special_device(&self) -> u64;
    /// Size in bytes.
    fn size(&self) -> i64;
    /// Last access time.
    fn accessed(&self) -> RawTime;
    /// Last modification time.
    fn modified(&self) -> RawTime;
    /// Last status change time.
    fn changed(&self) -> RawTime;
}

/// Owned snapshot of a native status record.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct RawStat {
    /// Device containing the file.
    pub dev: u64,
    /// Inode number.
    pub ino: u64,
    /// Full mode, type bits included.
    pub mode: u32,
    /// Hard link count.
    pub nlink: u64,
    /// Owner user id.
    pub uid: u32,
    /// Owner group id.
    pub gid: u32,
    /// Device id for special files.
    pub rdev: u64,
    /// Size in bytes.
    pub size: i64,
    /// Last access time.
    pub atime: RawTime,
    /// Last modification time.
    pub mtime: RawTime,
    /// Last status change time.
    pub ctime: RawTime,
}

impl NativeStat for RawStat {
    fn device(&self) -> u64 {
        self.dev
    }

    fn inode(&self) -> u64 {
        self.ino
    }

    fn mode(&self) -> u32 {
        self.mode
    }

    fn link_count(&self) -> u64 {
        self.nlink
    }

    fn owner(&self) -> u32 {
        self.uid
    }

    fn group(&self) -> u32 {
        self.gid
    }

    fn special_device(&self) -> u64 {
        self.rdev
    }

    fn size(&self) -> i64 {
        self.size
    }

    fn accessed(&self) -> RawTime {
        self.atime
    }

    fn modified(&self) -> RawTime {
        self.mtime
    }

    fn changed(&self) -> RawTime {
        self.ctime
    }
}

/// Reads a `*_nsec` field where the host `struct stat` has one.
#[cfg(unix)]
macro_rules! native_nanos {
    ($stat:expr, $field:ident) => {{
        #[cfg(any(
            target_os = "linux",
            target_os = "android",
            target_vendor = "apple",
            target_os = "freebsd"
        ))]
        let nanos = u32::try_from(($stat).$field as i64).ok();
        #[cfg(not(any(
            target_os = "linux",
            target_os = "android",
            target_vendor = "apple",
            target_os = "freebsd"
        )))]
        let nanos = {
            let _ = $stat;
            None
        };
        nanos
    }};
}

#[cfg(unix)]
impl NativeStat for libc::stat {
    fn device(&self) -> u64 {
        self.st_dev as u64
    }

    fn inode(&self) -> u64 {
        self.st_ino as u64
    }

    fn mode(&self) -> u32 {
        self.st_mode as u32
    }

    fn link_count(&self) -> u64 {
        self.st_nlink as u64
    }

    fn owner(&self) -> u32 {
        self.st_uid
    }

    fn group(&self) -> u32 {
        self.st_gid
    }

    fn special_device(&self) -> u64 {
        self.st_rdev as u64
    }

    fn size(&self) -> i64 {
        self.st_size as i64
    }

    fn accessed(&self) -> RawTime {
        RawTime {
            seconds: self.st_atime as i64,
            nanoseconds: native_nanos!(self, st_atime_nsec),
        }
    }

    fn modified(&self) -> RawTime {
        RawTime {
            seconds: self.st_mtime as i64,
            nanoseconds: native_nanos!(self, st_mtime_nsec),
        }
    }

    fn changed(&self) -> RawTime {
        RawTime {
            seconds: self.st_ctime as i64,
            nanoseconds: native_nanos!(self, st_ctime_nsec),
        }
    }
}
