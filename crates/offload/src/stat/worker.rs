//! Worker halves: one blocking syscall each, run on a pool thread.
//!
//! `errno` is read right after the call returns, before anything else can
//! overwrite it, and travels back inside the job.

use std::ffi::CStr;
use std::io;
use std::os::fd::RawFd;

/// Pairs a syscall return value with the `errno` it left behind.
fn capture(result: libc::c_int) -> (libc::c_int, i32) {
    if result < 0 {
        let code = io::Error::last_os_error().raw_os_error().unwrap_or(0);
        (result, code)
    } else {
        (result, 0)
    }
}

pub(super) fn stat(c_path: &CStr, out: &mut libc::stat) -> (libc::c_int, i32) {
    // SAFETY: c_path is NUL-terminated and out is a valid, exclusive out-pointer.
    let outcome = capture(unsafe { libc::stat(c_path.as_ptr(), out) });
    logging::trace_worker!(path = ?c_path, result = outcome.0, errno = outcome.1, "stat");
    outcome
}

pub(super) fn lstat(c_path: &CStr, out: &mut libc::stat) -> (libc::c_int, i32) {
    // SAFETY: c_path is NUL-terminated and out is a valid, exclusive out-pointer.
    let outcome = capture(unsafe { libc::lstat(c_path.as_ptr(), out) });
    logging::trace_worker!(path = ?c_path, result = outcome.0, errno = outcome.1, "lstat");
    outcome
}

pub(super) fn fstat(fd: RawFd, out: &mut libc::stat) -> (libc::c_int, i32) {
    // SAFETY: out is a valid, exclusive out-pointer. An invalid fd is
    // reported by the kernel as EBADF.
    let outcome = capture(unsafe { libc::fstat(fd, out) });
    logging::trace_worker!(fd, result = outcome.0, errno = outcome.1, "fstat");
    outcome
}
