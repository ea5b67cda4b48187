#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `offload` lets a single-threaded event loop issue `stat`, `lstat`, and
//! `fstat` without blocking. Each request becomes a job. A pool thread runs
//! the blocking syscall and records its result and `errno` inside the job;
//! the job then travels back to the thread that owns the [`Offload`], where
//! its completion handler builds a [`metadata::PortableStat`] or a
//! [`StatError`] and releases the job.
//!
//! # Design
//!
//! - [`Job`] splits work into `execute` (worker thread) and `complete`
//!   (event-loop thread). Jobs move between the two by value, so the job
//!   itself needs no locking.
//! - [`Offload`] owns the worker pool and the completion channel. Completion
//!   handlers run only inside [`Offload::run_completions`], [`Offload::wait`],
//!   and [`Offload::drain`].
//! - [`JobLedger`] counts allocations and releases, which makes leaks
//!   observable.
//! - [`Offload::stat_batch`] dispatches many requests at once.
//! - With the `async` feature, [`AsyncOffload`] runs the same jobs on tokio's
//!   blocking pool.
//!
//! # Examples
//!
//! ```no_run
//! use metadata::{FileKind, SizeWidth};
//! use offload::{Offload, OffloadConfig};
//!
//! # fn main() -> Result<(), offload::OffloadError> {
//! let mut offload = Offload::new(&OffloadConfig::new().workers(2))?;
//! let pending = offload.submit_lstat("/tmp", SizeWidth::Wide)?;
//! // ... other event-loop work ...
//! let status = offload.wait(&pending)?;
//! assert_eq!(status.kind, FileKind::Directory);
//! # Ok(())
//! # }
//! ```

mod config;
mod driver;
mod error;
mod job;
mod pool;

#[cfg(unix)]
mod batch;
#[cfg(unix)]
mod stat;

#[cfg(all(unix, feature = "async"))]
mod async_stat;

pub use config::{DEFAULT_THREAD_NAME_PREFIX, OffloadConfig, WORKERS_ENV_VAR};
pub use driver::{Offload, Pending};
pub use error::{OffloadError, StatError, Syscall};
pub use job::{Job, JobId, JobLedger, JobState};

#[cfg(unix)]
pub use batch::StatOp;
#[cfg(unix)]
pub use stat::{StatJob, StatRequest};

#[cfg(all(unix, feature = "async"))]
pub use async_stat::AsyncOffload;
