//! Tokio front-end.
//!
//! Worker halves run on tokio's blocking pool via `spawn_blocking`; the
//! completion half runs on the task that awaits the request, which plays the
//! event-loop role.

use std::os::fd::RawFd;
use std::path::Path;

use metadata::{PortableStat, SizeWidth};

use crate::error::OffloadError;
use crate::job::{Job, JobLedger, JobSlot};
use crate::stat::{StatJob, StatRequest};

/// Offloads jobs onto the ambient tokio runtime.
///
/// Must be used from within a runtime that allows blocking tasks.
#[derive(Clone, Debug, Default)]
pub struct AsyncOffload {
    ledger: JobLedger,
}

impl AsyncOffload {
    /// Creates a front-end with a fresh ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocation counters for every job run through this front-end.
    pub const fn ledger(&self) -> &JobLedger {
        &self.ledger
    }

    /// Runs `job` to completion.
    ///
    /// # Errors
    ///
    /// Returns the job's own error, or [`OffloadError::Join`] if the blocking
    /// task panicked or was cancelled. The job is released either way.
    pub async fn run<J: Job>(&self, job: J) -> Result<J::Output, OffloadError> {
        let mut slot = JobSlot::allocate(job, &self.ledger);
        slot.mark_dispatched();
        let slot = tokio::task::spawn_blocking(move || {
            slot.run_worker();
            slot
        })
        .await?;
        slot.complete()
    }

    /// Status of `path`, following symlinks.
    pub async fn stat_path(
        &self,
        path: impl AsRef<Path>,
        width: SizeWidth,
    ) -> Result<PortableStat, OffloadError> {
        let request = StatRequest::stat(path)?;
        self.run(StatJob::new(request, width)).await
    }

    /// Status of `path` itself.
    pub async fn lstat_path(
        &self,
        path: impl AsRef<Path>,
        width: SizeWidth,
    ) -> Result<PortableStat, OffloadError> {
        let request = StatRequest::lstat(path)?;
        self.run(StatJob::new(request, width)).await
    }

    /// Status of the file behind `fd`.
    ///
    /// The descriptor is not borrowed. Once the blocking task has started it
    /// runs to completion even if this future is dropped, so the caller must
    /// keep `fd` open until the blocking task has finished, not merely until
    /// the future is dropped.
    pub async fn stat_descriptor(
        &self,
        fd: RawFd,
        width: SizeWidth,
    ) -> Result<PortableStat, OffloadError> {
        self.run(StatJob::new(StatRequest::fstat(fd), width)).await
    }
}
