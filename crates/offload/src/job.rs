//! Job model: the per-request baton passed from a worker to its completion handler.
//!
//! A job is owned by exactly one party at a time. [`Offload::submit`] wraps it
//! in a slot and moves the slot into a worker task; the worker runs
//! [`Job::execute`] and moves the slot back to the event-loop thread, where
//! [`Job::complete`] consumes it. Ownership transfer is the only
//! synchronization the job itself needs.
//!
//! [`Offload::submit`]: crate::Offload::submit

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::error::OffloadError;

/// A unit of blocking work split into a worker half and a completion half.
pub trait Job: Send + 'static {
    /// Value produced by a successful completion.
    type Output: Send + 'static;

    /// Short name used in diagnostics.
    fn label(&self) -> &'static str;

    /// Performs the blocking call on a background thread.
    ///
    /// Must capture everything the completion needs, including transient
    /// error state such as `errno`, into `self`.
    fn execute(&mut self);

    /// Interprets the worker's result on the event-loop thread.
    ///
    /// Consumes the job, so it runs at most once and the job is freed on both
    /// the success and the failure path.
    fn complete(self) -> Result<Self::Output, OffloadError>;
}

/// Identifier of a job, unique within its [`JobLedger`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct JobId(u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a job. Each state has exactly one successor and `Released` is
/// terminal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum JobState {
    /// Allocated, not yet handed to the pool.
    Created,
    /// Queued for a worker.
    Dispatched,
    /// A worker is inside [`Job::execute`].
    WorkerRunning,
    /// The worker finished; waiting for the completion handler.
    Completed,
    /// Resources reclaimed.
    Released,
}

impl JobState {
    /// Returns the state that must follow this one.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::Dispatched),
            Self::Dispatched => Some(Self::WorkerRunning),
            Self::WorkerRunning => Some(Self::Completed),
            Self::Completed => Some(Self::Released),
            Self::Released => None,
        }
    }
}

#[derive(Debug, Default)]
struct LedgerCounts {
    next_id: AtomicU64,
    allocated: AtomicUsize,
    released: AtomicUsize,
}

/// Shared allocation counters for jobs.
///
/// Every job takes a lease on allocation and returns it exactly once when it
/// is dropped, whichever path it leaves by. `live() == 0` after all requests
/// have resolved means no job leaked.
#[derive(Clone, Debug, Default)]
pub struct JobLedger {
    counts: Arc<LedgerCounts>,
}

impl JobLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total jobs allocated.
    pub fn allocated(&self) -> usize {
        self.counts.allocated.load(Ordering::Acquire)
    }

    /// Total jobs released.
    pub fn released(&self) -> usize {
        self.counts.released.load(Ordering::Acquire)
    }

    /// Jobs allocated but not yet released.
    pub fn live(&self) -> usize {
        // Read `released` first so a concurrent release cannot make it exceed
        // the `allocated` value read afterwards.
        let released = self.released();
        self.allocated().saturating_sub(released)
    }

    fn lease(&self) -> Lease {
        let id = JobId(self.counts.next_id.fetch_add(1, Ordering::Relaxed));
        self.counts.allocated.fetch_add(1, Ordering::AcqRel);
        Lease {
            id,
            ledger: self.clone(),
        }
    }
}

/// One allocation in a [`JobLedger`], returned on drop.
#[derive(Debug)]
struct Lease {
    id: JobId,
    ledger: JobLedger,
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.ledger.counts.released.fetch_add(1, Ordering::AcqRel);
        logging::trace_job!(job = %self.id, "released");
    }
}

/// A job together with its lifecycle state and ledger lease.
pub(crate) struct JobSlot<J> {
    job: J,
    state: JobState,
    lease: Lease,
}

impl<J: Job> JobSlot<J> {
    pub(crate) fn allocate(job: J, ledger: &JobLedger) -> Self {
        let lease = ledger.lease();
        logging::trace_job!(job = %lease.id, kind = job.label(), "created");
        Self {
            job,
            state: JobState::Created,
            lease,
        }
    }

    pub(crate) const fn id(&self) -> JobId {
        self.lease.id
    }

    #[cfg(test)]
    pub(crate) const fn state(&self) -> JobState {
        self.state
    }

    fn advance(&mut self, next: JobState) {
        debug_assert_eq!(
            self.state.next(),
            Some(next),
            "job {} skipped from {:?} to {:?}",
            self.id(),
            self.state,
            next
        );
        self.state = next;
        logging::trace_job!(job = %self.id(), state = ?next, "transition");
    }

    pub(crate) fn mark_dispatched(&mut self) {
        self.advance(JobState::Dispatched);
    }

    /// Worker half. Runs on a background thread.
    pub(crate) fn run_worker(&mut self) {
        self.advance(JobState::WorkerRunning);
        self.job.execute();
        self.advance(JobState::Completed);
    }

    /// Completion half. Runs on the event-loop thread and releases the job.
    pub(crate) fn complete(mut self) -> Result<J::Output, OffloadError> {
        self.advance(JobState::Released);
        let Self { job, lease, .. } = self;
        let result = job.complete();
        drop(lease);
        result
    }
}
