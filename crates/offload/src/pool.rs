//! Fixed-size pool of named worker threads.
//!
//! Workers pull tasks from one shared unbounded channel, so submission never
//! blocks the caller. A panicking task is caught inside the worker loop and
//! the thread keeps serving the queue.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::config::OffloadConfig;
use crate::error::OffloadError;

/// A unit of work as seen by the pool.
pub(crate) type Task = Box<dyn FnOnce() + Send + 'static>;

/// Worker threads serving a shared task queue.
pub(crate) struct WorkerPool {
    sender: Option<Sender<Task>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `config.worker_count()` threads named `{prefix}-{index}`.
    pub(crate) fn start(config: &OffloadConfig) -> Result<Self, OffloadError> {
        let (sender, receiver) = unbounded::<Task>();
        let mut pool = Self {
            sender: Some(sender),
            handles: Vec::with_capacity(config.worker_count()),
        };

        for index in 0..config.worker_count() {
            let name = format!("{}-{index}", config.name_prefix());
            match spawn_worker(name, receiver.clone()) {
                Ok(handle) => pool.handles.push(handle),
                Err(error) => {
                    pool.shutdown();
                    return Err(OffloadError::Spawn(error));
                }
            }
        }

        logging::trace_pool!(workers = pool.handles.len(), "pool started");
        Ok(pool)
    }

    /// Number of live worker threads.
    pub(crate) fn workers(&self) -> usize {
        self.handles.len()
    }

    /// Queues `task` for the next free worker.
    pub(crate) fn execute(&self, task: Task) -> Result<(), OffloadError> {
        let sender = self.sender.as_ref().ok_or(OffloadError::PoolShutdown)?;
        sender.send(task).map_err(|_| OffloadError::PoolShutdown)
    }

    /// Closes the queue and joins every worker after it drains.
    pub(crate) fn shutdown(&mut self) {
        if self.sender.take().is_none() && self.handles.is_empty() {
            return;
        }
        for handle in self.handles.drain(..) {
            let name = handle.thread().name().map(str::to_owned);
            if handle.join().is_err() {
                logging::trace_pool!(worker = ?name, "worker exited abnormally");
            }
        }
        logging::trace_pool!("pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_worker(name: String, receiver: Receiver<Task>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(name)
        .spawn(move || worker_main(&receiver))
}

fn worker_main(receiver: &Receiver<Task>) {
    while let Ok(task) = receiver.recv() {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            logging::trace_pool!(
                worker = thread::current().name().unwrap_or("unnamed"),
                "task panicked"
            );
        }
    }
}
