//! crates/logging/src/thread_local.rs
//! Thread-local verbosity configuration and diagnostic capture.
//!
//! Events are captured on the thread that emits them. Completion handlers run
//! on the event-loop thread, so their diagnostics are visible to whoever owns
//! that thread; worker-thread events stay with the worker.
//!
//! Each buffer holds at most [`MAX_BUFFERED_EVENTS`]; once full, the oldest
//! event is discarded for every new one.

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Upper bound on the events a single thread keeps between drains.
pub const MAX_BUFFERED_EVENTS: usize = 1024;

thread_local! {
    static VERBOSITY: RefCell<VerbosityConfig> = RefCell::new(VerbosityConfig::default());
    static EVENTS: RefCell<VecDeque<DiagnosticEvent>> = const { RefCell::new(VecDeque::new()) };
}

fn push(event: DiagnosticEvent) {
    EVENTS.with(|e| {
        let mut events = e.borrow_mut();
        if events.len() == MAX_BUFFERED_EVENTS {
            events.pop_front();
        }
        events.push_back(event);
    });
}

/// Diagnostic event collected during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// Info-level diagnostic event.
    Info {
        /// The info flag category.
        flag: InfoFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
    /// Debug-level diagnostic event.
    Debug {
        /// The debug flag category.
        flag: DebugFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
}

impl DiagnosticEvent {
    /// Returns the message text.
    pub fn message(&self) -> &str {
        match self {
            Self::Info { message, .. } | Self::Debug { message, .. } => message,
        }
    }
}

/// Install `config` as the current thread's verbosity.
pub fn init(config: VerbosityConfig) {
    VERBOSITY.with(|v| {
        *v.borrow_mut() = config;
    });
}

/// Returns a copy of the current thread's verbosity.
pub fn current() -> VerbosityConfig {
    VERBOSITY.with(|v| v.borrow().clone())
}

/// Check if the info flag is at or above the specified level.
pub fn info_gte(flag: InfoFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().info.get(flag) >= level)
}

/// Check if the debug flag is at or above the specified level.
pub fn debug_gte(flag: DebugFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().debug.get(flag) >= level)
}

/// Record an info diagnostic event.
pub fn emit_info(flag: InfoFlag, level: u8, message: String) {
    push(DiagnosticEvent::Info {
        flag,
        level,
        message,
    });
}

/// Record a debug diagnostic event.
pub fn emit_debug(flag: DebugFlag, level: u8, message: String) {
    push(DiagnosticEvent::Debug {
        flag,
        level,
        message,
    });
}

/// Drain all collected events, clearing the internal buffer.
pub fn drain_events() -> Vec<DiagnosticEvent> {
    EVENTS.with(|e| e.borrow_mut().drain(..).collect())
}
