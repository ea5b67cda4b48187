//! Worker pool configuration.

/// Environment variable consulted for the worker count when none is given.
pub const WORKERS_ENV_VAR: &str = "OC_STAT_WORKERS";

/// Default thread name prefix for pool workers.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "oc-stat-worker";

/// Maximum sane worker count.
///
/// Each in-flight stat holds at most one path buffer and one native record, so
/// the bound guards thread count rather than memory.
const MAX_WORKERS_UPPER_BOUND: usize = 64;

/// Minimum worker count - always at least one worker.
const MAX_WORKERS_LOWER_BOUND: usize = 1;

/// Resolves the effective worker count.
///
/// Priority: explicit value > `env_value` > CPU-derived default. Result is
/// clamped to [`MAX_WORKERS_LOWER_BOUND`, `MAX_WORKERS_UPPER_BOUND`].
fn resolve_workers(explicit: Option<usize>, env_value: Option<&str>) -> usize {
    let cpu_default = || {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4)
    };
    let raw = if let Some(value) = explicit {
        value
    } else if let Some(value) = env_value {
        value.trim().parse::<usize>().unwrap_or_else(|_| cpu_default())
    } else {
        cpu_default()
    };
    raw.clamp(MAX_WORKERS_LOWER_BOUND, MAX_WORKERS_UPPER_BOUND)
}

/// Configuration for the worker pool behind an [`Offload`](crate::Offload).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OffloadConfig {
    workers: usize,
    thread_name_prefix: String,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OffloadConfig {
    /// Creates a configuration with an environment- or CPU-derived worker count.
    ///
    /// Reads [`WORKERS_ENV_VAR`] when set; otherwise uses
    /// `available_parallelism()`. Either way the count is clamped to `[1, 64]`.
    #[must_use]
    pub fn new() -> Self {
        let env_value = std::env::var(WORKERS_ENV_VAR).ok();
        Self {
            workers: resolve_workers(None, env_value.as_deref()),
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_owned(),
        }
    }

    /// Sets the number of worker threads, clamped to `[1, 64]`.
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = resolve_workers(Some(workers), None);
        self
    }

    /// Sets the prefix of worker thread names; threads are named `{prefix}-{index}`.
    #[must_use]
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Returns the configured worker count.
    pub const fn worker_count(&self) -> usize {
        self.workers
    }

    /// Returns the worker thread name prefix.
    pub fn name_prefix(&self) -> &str {
        &self.thread_name_prefix
    }
}
