//! The `stat`/`lstat`/`fstat` jobs and the caller-facing request methods.
//!
//! Each request becomes a [`StatJob`]. Its worker half performs the one
//! syscall and records the return value and `errno`; its completion half
//! turns that into a [`PortableStat`] or a [`StatError`].

mod completion;
mod worker;

use std::ffi::CString;
use std::os::fd::{AsFd, AsRawFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use metadata::{PortableStat, SizeWidth};

use crate::driver::{Offload, Pending};
use crate::error::{OffloadError, StatError, Syscall};
use crate::job::Job;

/// The input of one status request.
///
/// Built only through [`StatRequest::stat`], [`StatRequest::lstat`], or
/// [`StatRequest::fstat`], so the path reported in an error is always the path
/// handed to the OS.
///
/// ```compile_fail
/// let request = offload::StatRequest { target: todo!() };
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatRequest {
    target: Target,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Target {
    Stat(EncodedPath),
    Lstat(EncodedPath),
    Fstat(RawFd),
}

/// A path and the NUL-terminated copy of it handed to the OS.
#[derive(Clone, Debug, Eq, PartialEq)]
struct EncodedPath {
    c_path: CString,
    path: PathBuf,
}

impl EncodedPath {
    fn new(syscall: Syscall, path: &Path) -> Result<Self, StatError> {
        match CString::new(path.as_os_str().as_bytes()) {
            Ok(c_path) => Ok(Self {
                c_path,
                path: path.to_path_buf(),
            }),
            Err(_) => Err(StatError::with_path(syscall, libc::ENOENT, path)),
        }
    }
}

impl StatRequest {
    /// A following request for `path`.
    ///
    /// # Errors
    ///
    /// A path with an interior NUL byte cannot name a file; it is rejected
    /// as `ENOENT` for `stat`.
    pub fn stat(path: impl AsRef<Path>) -> Result<Self, StatError> {
        let encoded = EncodedPath::new(Syscall::Stat, path.as_ref())?;
        Ok(Self {
            target: Target::Stat(encoded),
        })
    }

    /// A non-following request for `path`.
    ///
    /// # Errors
    ///
    /// As [`StatRequest::stat`], reported for `lstat`.
    pub fn lstat(path: impl AsRef<Path>) -> Result<Self, StatError> {
        let encoded = EncodedPath::new(Syscall::Lstat, path.as_ref())?;
        Ok(Self {
            target: Target::Lstat(encoded),
        })
    }

    /// A request for an open descriptor.
    ///
    /// The descriptor is not owned; it must stay open until the request
    /// completes.
    pub const fn fstat(fd: RawFd) -> Self {
        Self {
            target: Target::Fstat(fd),
        }
    }

    /// The syscall this request performs.
    pub const fn syscall(&self) -> Syscall {
        match self.target {
            Target::Stat(_) => Syscall::Stat,
            Target::Lstat(_) => Syscall::Lstat,
            Target::Fstat(_) => Syscall::Fstat,
        }
    }

    /// The queried path, for path-based requests.
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Target::Stat(encoded) | Target::Lstat(encoded) => Some(&encoded.path),
            Target::Fstat(_) => None,
        }
    }

    fn into_path(self) -> Option<PathBuf> {
        match self.target {
            Target::Stat(encoded) | Target::Lstat(encoded) => Some(encoded.path),
            Target::Fstat(_) => None,
        }
    }
}

/// One in-flight status request.
///
/// Written only by its worker, then read only by its completion handler.
pub struct StatJob {
    request: StatRequest,
    width: SizeWidth,
    raw: libc::stat,
    result: libc::c_int,
    error_code: i32,
}

impl StatJob {
    /// Prepares `request`; `width` selects the size representation.
    pub fn new(request: StatRequest, width: SizeWidth) -> Self {
        Self {
            request,
            width,
            // SAFETY: libc::stat is plain old data; all-zero is a valid value.
            raw: unsafe { std::mem::zeroed() },
            result: 0,
            error_code: 0,
        }
    }

    /// The request this job carries.
    pub const fn request(&self) -> &StatRequest {
        &self.request
    }
}

impl Job for StatJob {
    type Output = PortableStat;

    fn label(&self) -> &'static str {
        self.request.syscall().name()
    }

    fn execute(&mut self) {
        let (result, error_code) = match &self.request.target {
            Target::Stat(encoded) => worker::stat(&encoded.c_path, &mut self.raw),
            Target::Lstat(encoded) => worker::lstat(&encoded.c_path, &mut self.raw),
            Target::Fstat(fd) => worker::fstat(*fd, &mut self.raw),
        };
        self.result = result;
        self.error_code = error_code;
    }

    fn complete(self) -> Result<PortableStat, OffloadError> {
        completion::finish(self)
    }
}

impl Offload {
    /// Dispatches `stat` on `path`.
    ///
    /// # Errors
    ///
    /// Fails at submission for a path with an interior NUL byte, or when the
    /// pool has shut down.
    pub fn submit_stat(
        &mut self,
        path: impl AsRef<Path>,
        width: SizeWidth,
    ) -> Result<Pending<PortableStat>, OffloadError> {
        let request = StatRequest::stat(path)?;
        self.submit(StatJob::new(request, width))
    }

    /// Dispatches `lstat` on `path`.
    ///
    /// # Errors
    ///
    /// As [`Offload::submit_stat`].
    pub fn submit_lstat(
        &mut self,
        path: impl AsRef<Path>,
        width: SizeWidth,
    ) -> Result<Pending<PortableStat>, OffloadError> {
        let request = StatRequest::lstat(path)?;
        self.submit(StatJob::new(request, width))
    }

    /// Dispatches `fstat` on `fd`.
    ///
    /// The caller keeps `fd` open until the returned handle resolves.
    ///
    /// # Errors
    ///
    /// Fails when the pool has shut down.
    pub fn submit_fstat(
        &mut self,
        fd: RawFd,
        width: SizeWidth,
    ) -> Result<Pending<PortableStat>, OffloadError> {
        self.submit(StatJob::new(StatRequest::fstat(fd), width))
    }

    /// Status of `path`, following symlinks.
    ///
    /// # Errors
    ///
    /// [`OffloadError::Syscall`] carries the path and `errno` when `stat`
    /// fails.
    pub fn stat_path(
        &mut self,
        path: impl AsRef<Path>,
        width: SizeWidth,
    ) -> Result<PortableStat, OffloadError> {
        let pending = self.submit_stat(path, width)?;
        self.wait(&pending)
    }

    /// Status of `path` itself, not following a final symlink.
    ///
    /// # Errors
    ///
    /// As [`Offload::stat_path`], reported for `lstat`.
    pub fn lstat_path(
        &mut self,
        path: impl AsRef<Path>,
        width: SizeWidth,
    ) -> Result<PortableStat, OffloadError> {
        let pending = self.submit_lstat(path, width)?;
        self.wait(&pending)
    }

    /// Status of the file behind an open descriptor.
    ///
    /// # Errors
    ///
    /// [`OffloadError::Syscall`] without a path when `fstat` fails.
    pub fn stat_descriptor(
        &mut self,
        fd: impl AsFd,
        width: SizeWidth,
    ) -> Result<PortableStat, OffloadError> {
        let fd = fd.as_fd();
        let pending = self.submit_fstat(fd.as_raw_fd(), width)?;
        self.wait(&pending)
    }
}
