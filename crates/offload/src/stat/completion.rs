//! Completion halves: interpret a finished worker on the event-loop thread.

use metadata::{PortableStat, normalize};

use super::StatJob;
use crate::error::{OffloadError, StatError};

/// Consumes a finished job and produces its result.
///
/// The job is dropped here on both paths; the caller releases its lease right
/// after.
pub(super) fn finish(job: StatJob) -> Result<PortableStat, OffloadError> {
    let StatJob {
        request,
        width,
        raw,
        result,
        error_code,
    } = job;
    let syscall = request.syscall();

    if result < 0 {
        let error = match request.into_path() {
            Some(path) => StatError::with_path(syscall, error_code, path),
            None => StatError::descriptor(error_code),
        };
        logging::trace_complete!(%syscall, errno = error_code, "failed: {error}");
        return Err(error.into());
    }

    let status = normalize(&raw, width);
    logging::trace_complete!(%syscall, kind = %status.kind, "normalized");
    Ok(status)
}
