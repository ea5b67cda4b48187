//! Error types for offloaded status requests.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::job::JobId;

/// The file-status syscalls this crate offloads.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Syscall {
    /// `stat(2)`: by path, following symlinks.
    Stat,
    /// `lstat(2)`: by path, reporting a symlink itself.
    Lstat,
    /// `fstat(2)`: by open descriptor.
    Fstat,
}

impl Syscall {
    /// Returns the syscall name as reported in errors.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stat => "stat",
            Self::Lstat => "lstat",
            Self::Fstat => "fstat",
        }
    }

    /// Returns `true` for the path-based syscalls.
    pub const fn takes_path(self) -> bool {
        matches!(self, Self::Stat | Self::Lstat)
    }
}

impl fmt::Display for Syscall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failed status syscall.
///
/// Carries the syscall, the OS error code captured right after the call, and
/// the queried path for path-based syscalls. The code is kept exactly as the
/// OS reported it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatError {
    syscall: Syscall,
    code: i32,
    path: Option<PathBuf>,
}

impl StatError {
    /// Creates an error for a path-based syscall.
    pub fn with_path(syscall: Syscall, code: i32, path: impl Into<PathBuf>) -> Self {
        Self {
            syscall,
            code,
            path: Some(path.into()),
        }
    }

    /// Creates an error for `fstat`, which has no path.
    pub const fn descriptor(code: i32) -> Self {
        Self {
            syscall: Syscall::Fstat,
            code,
            path: None,
        }
    }

    /// Returns the failing syscall.
    pub const fn syscall(&self) -> Syscall {
        self.syscall
    }

    /// Returns the raw OS error code.
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Returns the queried path, if the syscall took one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the OS error as an [`io::Error`].
    pub fn io_error(&self) -> io::Error {
        io::Error::from_raw_os_error(self.code)
    }

    /// Returns the [`io::ErrorKind`] of the OS error.
    pub fn kind(&self) -> io::ErrorKind {
        self.io_error().kind()
    }
}

impl fmt::Display for StatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(
                f,
                "{} '{}': {}",
                self.syscall,
                path.display(),
                self.io_error()
            ),
            None => write!(f, "{}: {}", self.syscall, self.io_error()),
        }
    }
}

impl std::error::Error for StatError {}

/// Error type for offloaded requests.
#[derive(Debug, thiserror::Error)]
pub enum OffloadError {
    /// The syscall itself failed.
    #[error(transparent)]
    Syscall(#[from] StatError),

    /// The worker pool no longer accepts jobs.
    #[error("worker pool has shut down")]
    PoolShutdown,

    /// The job was dropped before its completion handler ran.
    #[error("job {job} was lost before completion")]
    WorkerLost {
        /// The lost job.
        job: JobId,
    },

    /// A worker thread could not be started.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    /// Error joining a blocking task.
    #[cfg(feature = "async")]
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl OffloadError {
    /// Returns the syscall failure, if that is what this error is.
    pub const fn as_syscall(&self) -> Option<&StatError> {
        match self {
            Self::Syscall(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn path_error_names_syscall_and_path() {
        let error = StatError::with_path(Syscall::Lstat, libc::ENOENT, "/no/such");
        let display = error.to_string();
        assert!(display.starts_with("lstat '/no/such': "));
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
        assert_eq!(error.path(), Some(Path::new("/no/such")));
    }

    #[cfg(unix)]
    #[test]
    fn descriptor_error_has_no_path() {
        let error = StatError::descriptor(libc::EBADF);
        assert_eq!(error.syscall(), Syscall::Fstat);
        assert_eq!(error.code(), libc::EBADF);
        assert!(error.path().is_none());
        assert!(error.to_string().starts_with("fstat: "));
    }

    #[test]
    fn offload_error_is_transparent_over_stat_error() {
        let inner = StatError::descriptor(9);
        let error = OffloadError::from(inner.clone());
        assert_eq!(error.to_string(), inner.to_string());
        assert_eq!(error.as_syscall(), Some(&inner));
        assert!(OffloadError::PoolShutdown.as_syscall().is_none());
    }

    #[test]
    fn syscall_names() {
        assert_eq!(Syscall::Stat.name(), "stat");
        assert_eq!(Syscall::Lstat.to_string(), "lstat");
        assert!(Syscall::Lstat.takes_path());
        assert!(!Syscall::Fstat.takes_path());
    }
}
