//! crates/logging/src/tracing_macros.rs
//! Target-specific wrappers around the standard tracing macros.

/// Emit a per-request result trace.
///
/// # Example
/// ```ignore
/// trace_stat!("{}: {}", path, kind);
/// ```
#[macro_export]
macro_rules! trace_stat {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "oc_stat::stat", $($arg)*);
    };
}

/// Emit an end-of-run summary trace.
///
/// # Example
/// ```ignore
/// trace_summary!("{} requests, {} failed", total, failed);
/// ```
#[macro_export]
macro_rules! trace_summary {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "oc_stat::summary", $($arg)*);
    };
}

/// Emit a job lifecycle trace.
///
/// # Example
/// ```ignore
/// trace_job!(job = id, "dispatched");
/// ```
#[macro_export]
macro_rules! trace_job {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "oc_stat::job", $($arg)*);
    };
}

/// Emit a completion handler trace.
///
/// # Example
/// ```ignore
/// trace_complete!("lstat failed with errno {}", code);
/// ```
#[macro_export]
macro_rules! trace_complete {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "oc_stat::complete", $($arg)*);
    };
}

/// Emit a worker pool trace.
///
/// # Example
/// ```ignore
/// trace_pool!("started {} workers", count);
/// ```
#[macro_export]
macro_rules! trace_pool {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "oc_stat::pool", $($arg)*);
    };
}

/// Emit a worker syscall trace.
///
/// # Example
/// ```ignore
/// trace_worker!("fstat({}) = {}", fd, result);
/// ```
#[macro_export]
macro_rules! trace_worker {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "oc_stat::worker", $($arg)*);
    };
}
