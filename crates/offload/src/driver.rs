//! Event-loop side of the offload: submission, completion delivery, and waiting.
//!
//! ```text
//! event-loop thread                      worker thread
//! ─────────────────                      ─────────────
//! submit(job)  ── Task ───────────────▶  slot.run_worker()
//!                                        │
//! run_completions / wait / drain         │
//!   finished_rx ◀──── Finishing{slot} ───┘
//!   slot.complete()  ── reply ──▶ Pending
//! ```
//!
//! Completion handlers run only on the thread that calls
//! [`Offload::run_completions`], [`Offload::wait`], or [`Offload::drain`].

use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded, select, unbounded};

use crate::config::OffloadConfig;
use crate::error::OffloadError;
use crate::job::{Job, JobId, JobLedger, JobSlot};
use crate::pool::WorkerPool;

/// A worker's hand-off back to the event-loop thread.
trait Finished: Send {
    fn finish(self: Box<Self>);
}

struct Finishing<J: Job> {
    slot: JobSlot<J>,
    reply: Sender<Result<J::Output, OffloadError>>,
}

impl<J: Job> Finished for Finishing<J> {
    fn finish(self: Box<Self>) {
        let Self { slot, reply } = *self;
        let id = slot.id();
        let result = slot.complete();
        if reply.send(result).is_err() {
            logging::trace_complete!(job = %id, "result discarded, handle dropped");
        }
    }
}

/// A job whose worker panicked; the slot was dropped during unwinding.
struct Lost<T> {
    id: JobId,
    reply: Sender<Result<T, OffloadError>>,
}

impl<T: Send> Finished for Lost<T> {
    fn finish(self: Box<Self>) {
        let _ = self.reply.send(Err(OffloadError::WorkerLost { job: self.id }));
    }
}

/// Handle to the result of a submitted job.
///
/// The value is delivered once the owning [`Offload`] has run the job's
/// completion handler. Dropping the handle does not cancel the job; it still
/// runs and is released, and its result is discarded.
#[must_use = "a pending job's result is lost unless it is waited on"]
#[derive(Debug)]
pub struct Pending<T> {
    id: JobId,
    reply: Receiver<Result<T, OffloadError>>,
}

impl<T> Pending<T> {
    /// Identifier of the underlying job.
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the result if the completion handler has already run.
    pub fn try_take(&self) -> Option<Result<T, OffloadError>> {
        match self.reply.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(OffloadError::WorkerLost { job: self.id })),
        }
    }
}

/// Runs blocking jobs on a worker pool and their completions on the owning thread.
pub struct Offload {
    pool: WorkerPool,
    finished_tx: Sender<Box<dyn Finished>>,
    finished_rx: Receiver<Box<dyn Finished>>,
    ledger: JobLedger,
    in_flight: usize,
}

impl Offload {
    /// Starts the worker pool described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`OffloadError::Spawn`] if a worker thread cannot be created.
    pub fn new(config: &OffloadConfig) -> Result<Self, OffloadError> {
        let pool = WorkerPool::start(config)?;
        let (finished_tx, finished_rx) = unbounded();
        Ok(Self {
            pool,
            finished_tx,
            finished_rx,
            ledger: JobLedger::new(),
            in_flight: 0,
        })
    }

    /// Starts a pool with [`OffloadConfig::new`].
    ///
    /// # Errors
    ///
    /// See [`Offload::new`].
    pub fn with_defaults() -> Result<Self, OffloadError> {
        Self::new(&OffloadConfig::new())
    }

    /// Allocation counters for every job this driver has created.
    pub const fn ledger(&self) -> &JobLedger {
        &self.ledger
    }

    /// Jobs dispatched whose completion handler has not run yet.
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Allocates `job` and dispatches its worker half to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`OffloadError::PoolShutdown`] when the pool no longer accepts
    /// work. The job is released before returning.
    pub fn submit<J: Job>(&mut self, job: J) -> Result<Pending<J::Output>, OffloadError> {
        let mut slot = JobSlot::allocate(job, &self.ledger);
        let id = slot.id();
        let (reply_tx, reply_rx) = bounded(1);
        let finished_tx = self.finished_tx.clone();

        slot.mark_dispatched();
        let task = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
                slot.run_worker();
                slot
            }));
            let finished: Box<dyn Finished> = match outcome {
                Ok(slot) => Box::new(Finishing {
                    slot,
                    reply: reply_tx,
                }),
                Err(_) => {
                    logging::trace_job!(job = %id, "worker panicked");
                    Box::new(Lost {
                        id,
                        reply: reply_tx,
                    })
                }
            };
            let _ = finished_tx.send(finished);
        });

        self.pool.execute(task)?;
        self.in_flight += 1;
        logging::trace_job!(job = %id, in_flight = self.in_flight, "dispatched");
        Ok(Pending { id, reply: reply_rx })
    }

    fn finish(&mut self, finished: Box<dyn Finished>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        finished.finish();
    }

    /// Runs the completion handlers of every job that has already finished.
    ///
    /// Never blocks. Returns how many handlers ran.
    pub fn run_completions(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(finished) = self.finished_rx.try_recv() {
            self.finish(finished);
            ran += 1;
        }
        ran
    }

    /// Blocks until `pending` resolves, running completions as they arrive.
    ///
    /// Other jobs finishing meanwhile have their handlers run too; their
    /// results wait in their own handles.
    ///
    /// # Errors
    ///
    /// Returns the job's own error, or [`OffloadError::WorkerLost`] if the job
    /// can no longer produce a result.
    pub fn wait<T>(&mut self, pending: &Pending<T>) -> Result<T, OffloadError> {
        let finished_rx = self.finished_rx.clone();
        loop {
            if let Some(result) = pending.try_take() {
                return result;
            }
            if self.in_flight == 0 {
                return Err(OffloadError::WorkerLost { job: pending.id });
            }
            select! {
                recv(finished_rx) -> finished => match finished {
                    Ok(finished) => self.finish(finished),
                    Err(_) => return Err(OffloadError::WorkerLost { job: pending.id }),
                },
                recv(pending.reply) -> result => {
                    return result.unwrap_or(Err(OffloadError::WorkerLost { job: pending.id }));
                }
            }
        }
    }

    /// Blocks until every dispatched job has completed.
    pub fn drain(&mut self) {
        while self.in_flight > 0 {
            match self.finished_rx.recv() {
                Ok(finished) => self.finish(finished),
                Err(_) => break,
            }
        }
    }
}

impl Drop for Offload {
    fn drop(&mut self) {
        self.pool.shutdown();
        self.run_completions();
        logging::trace_pool!(
            allocated = self.ledger.allocated(),
            live = self.ledger.live(),
            "offload dropped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Square(u64);

    impl Job for Square {
        type Output = u64;

        fn label(&self) -> &'static str {
            "square"
        }

        fn execute(&mut self) {
            self.0 *= self.0;
        }

        fn complete(self) -> Result<u64, OffloadError> {
            Ok(self.0)
        }
    }

    struct Panics;

    impl Job for Panics {
        type Output = ();

        fn label(&self) -> &'static str {
            "panics"
        }

        fn execute(&mut self) {
            panic!("worker failure");
        }

        fn complete(self) -> Result<(), OffloadError> {
            Ok(())
        }
    }

    /// Counts completion-handler invocations.
    struct Counted(Arc<AtomicUsize>);

    impl Job for Counted {
        type Output = ();

        fn label(&self) -> &'static str {
            "counted"
        }

        fn execute(&mut self) {}

        fn complete(self) -> Result<(), OffloadError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn offload(workers: usize) -> Offload {
        Offload::new(&OffloadConfig::new().workers(workers)).unwrap()
    }

    #[test]
    fn wait_returns_the_completed_value() {
        let mut offload = offload(2);
        let pending = offload.submit(Square(12)).unwrap();
        assert_eq!(offload.wait(&pending).unwrap(), 144);
        assert_eq!(offload.in_flight(), 0);
        assert_eq!(offload.ledger().live(), 0);
    }

    #[test]
    fn completions_run_only_when_driven() {
        let mut offload = offload(1);
        let calls = Arc::new(AtomicUsize::new(0));
        let pending = offload.submit(Counted(Arc::clone(&calls))).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(pending.try_take().is_none());

        offload.drain();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(pending.try_take(), Some(Ok(()))));
    }

    #[test]
    fn panicking_worker_reports_lost_job_and_releases_it() {
        let mut offload = offload(1);
        let pending = offload.submit(Panics).unwrap();
        let id = pending.id();
        match offload.wait(&pending) {
            Err(OffloadError::WorkerLost { job }) => assert_eq!(job, id),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(offload.ledger().live(), 0);

        let next = offload.submit(Square(3)).unwrap();
        assert_eq!(offload.wait(&next).unwrap(), 9);
    }

    #[test]
    fn dropped_handle_still_releases_job() {
        let mut offload = offload(2);
        drop(offload.submit(Square(4)).unwrap());
        offload.drain();
        assert_eq!(offload.ledger().allocated(), 1);
        assert_eq!(offload.ledger().live(), 0);
    }

    #[test]
    fn dropping_the_driver_completes_outstanding_jobs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ledger = {
            let mut offload = offload(2);
            for _ in 0..8 {
                let _ = offload.submit(Counted(Arc::clone(&calls))).unwrap();
            }
            offload.ledger().clone()
        };
        assert_eq!(calls.load(Ordering::SeqCst), 8);
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn foreign_handle_does_not_hang() {
        let mut first = offload(1);
        let mut second = offload(1);
        let pending = first.submit(Square(2)).unwrap();
        first.drain();
        let _ = pending.try_take();
        assert!(matches!(
            second.wait(&pending),
            Err(OffloadError::WorkerLost { .. })
        ));
    }
}
