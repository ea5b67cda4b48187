//! Batched status requests.
//!
//! Every operation in a batch is dispatched before any is waited on, so the
//! whole batch is in flight at once. Results come back in input order even
//! though the workers may finish in any order.

use std::os::fd::RawFd;
use std::path::PathBuf;

use metadata::{PortableStat, SizeWidth};

use crate::driver::{Offload, Pending};
use crate::error::OffloadError;

/// One operation in a batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StatOp {
    /// Stat a path, following symlinks.
    Stat(PathBuf),
    /// Lstat a path.
    Lstat(PathBuf),
    /// Fstat a descriptor the caller keeps open for the whole batch.
    Fstat(RawFd),
}

impl Offload {
    fn submit_op(
        &mut self,
        op: StatOp,
        width: SizeWidth,
    ) -> Result<Pending<PortableStat>, OffloadError> {
        match op {
            StatOp::Stat(path) => self.submit_stat(path, width),
            StatOp::Lstat(path) => self.submit_lstat(path, width),
            StatOp::Fstat(fd) => self.submit_fstat(fd, width),
        }
    }

    /// Runs every operation in `ops` concurrently.
    ///
    /// The result vector lines up with `ops`. A failure in one operation,
    /// including a rejected path, does not affect the others.
    pub fn stat_batch(
        &mut self,
        ops: impl IntoIterator<Item = StatOp>,
        width: SizeWidth,
    ) -> Vec<Result<PortableStat, OffloadError>> {
        let submitted: Vec<_> = ops
            .into_iter()
            .map(|op| self.submit_op(op, width))
            .collect();
        logging::trace_pool!(batch = submitted.len(), "batch dispatched");

        submitted
            .into_iter()
            .map(|entry| entry.and_then(|pending| self.wait(&pending)))
            .collect()
    }
}
