//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the oc-stat verbosity flags.
//!
//! [`StatLayer`] maps each event's target onto an [`InfoFlag`] or
//! [`DebugFlag`] and records the event into the emitting thread's diagnostic
//! buffer when that flag's level admits it. Nothing installs the layer
//! implicitly; callers that read [`crate::drain_events`] add it themselves.
//! [`init_tracing`] installs only a stderr formatter filtered by the
//! configuration.
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2))?;
//! tracing::debug!(target: "oc_stat::job", "job dispatched");
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use super::thread_local::{debug_gte, emit_debug, emit_info, info_gte};
use tracing::{Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

/// Environment variable holding `EnvFilter` directives that override the
/// verbosity-derived filter.
pub const LOG_ENV_VAR: &str = "OC_STAT_LOG";

/// A tracing layer that records flag-mapped events into thread-local storage.
pub struct StatLayer {
    config: VerbosityConfig,
}

impl StatLayer {
    /// Create a layer for the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { config }
    }

    /// Map a tracing level to a verbosity level.
    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO => 1,
            Level::DEBUG => 2,
            Level::TRACE => 3,
        }
    }

    fn admits_debug(&self, flag: DebugFlag, level: u8) -> bool {
        self.config.debug.get(flag) >= level || debug_gte(flag, level)
    }

    fn admits_info(&self, flag: InfoFlag, level: u8) -> bool {
        self.config.info.get(flag) >= level || info_gte(flag, level)
    }
}

impl<S> Layer<S> for StatLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        let verbosity_level = Self::level_to_verbosity_level(metadata.level());

        if let Some(flag) = DebugFlag::from_target(target) {
            if self.admits_debug(flag, verbosity_level) {
                if let Some(message) = MessageVisitor::collect(event) {
                    emit_debug(flag, verbosity_level, message);
                }
            }
            return;
        }

        if let Some(flag) = InfoFlag::from_target(target) {
            if self.admits_info(flag, verbosity_level) {
                if let Some(message) = MessageVisitor::collect(event) {
                    emit_info(flag, verbosity_level, message);
                }
            }
        }
    }
}

/// Visitor to extract the message from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl MessageVisitor {
    fn collect(event: &tracing::Event<'_>) -> Option<String> {
        let mut visitor = Self::default();
        event.record(&mut visitor);
        visitor.message
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Builds the filter used by [`init_tracing`].
///
/// Directives in [`LOG_ENV_VAR`] win; otherwise the filter is derived from
/// `config`.
pub fn env_filter(config: &VerbosityConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()))
}

/// Initialize tracing with the given verbosity configuration.
///
/// Installs a registry with an [`EnvFilter`] and a formatter writing to
/// stderr. The calling thread's verbosity is set to `config` as well. Fails if
/// a global subscriber is already installed.
pub fn init_tracing(config: VerbosityConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = env_filter(&config);
    super::thread_local::init(config);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}
