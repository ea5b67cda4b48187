#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` carries the verbosity model shared by the `oc-stat` crates. Every
//! diagnostic belongs to a category: an [`InfoFlag`] for output a user asked
//! for (`-v`), or a [`DebugFlag`] for internals of the offload machinery (job
//! lifecycle, workers, the pool, completion handlers). A [`VerbosityConfig`]
//! holds one level per category.
//!
//! # Design
//!
//! - [`VerbosityConfig::from_verbose_level`] maps a `-v` count onto levels, and
//!   `apply_info_flag`/`apply_debug_flag` adjust single categories from tokens
//!   such as `job2`.
//! - With the `tracing` feature, each category has its own tracing target and
//!   macro (`trace_job!`, `trace_worker!`, ...). `init_tracing` installs a
//!   filtered stderr formatter. `StatLayer` is opt-in: it records admitted
//!   events into a bounded thread-local buffer read by [`drain_events`].
//!
//! # Examples
//!
//! ```
//! use logging::{DebugFlag, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::from_verbose_level(1);
//! config.apply_debug_flag("worker2").unwrap();
//! assert_eq!(config.debug.get(DebugFlag::Worker), 2);
//! ```

mod config;
mod levels;
mod thread_local;

#[cfg(feature = "tracing")]
mod tracing_bridge;
#[cfg(feature = "tracing")]
mod tracing_macros;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use thread_local::{
    DiagnosticEvent, MAX_BUFFERED_EVENTS, current, debug_gte, drain_events, emit_debug, emit_info,
    info_gte, init,
};

#[cfg(feature = "tracing")]
pub use tracing_bridge::{LOG_ENV_VAR, StatLayer, env_filter, init_tracing};
