//! The target macros route events onto the matching verbosity flags.

#![cfg(feature = "tracing")]

use logging::{DebugFlag, DiagnosticEvent, InfoFlag, StatLayer, VerbosityConfig, drain_events, init};
use tracing_subscriber::layer::SubscriberExt;

fn capture(config: VerbosityConfig, emit: impl FnOnce()) -> Vec<DiagnosticEvent> {
    init(VerbosityConfig::default());
    drain_events();
    let subscriber = tracing_subscriber::registry().with(StatLayer::new(config));
    tracing::subscriber::with_default(subscriber, emit);
    drain_events()
}

#[test]
fn every_macro_lands_on_its_flag() {
    let events = capture(VerbosityConfig::from_verbose_level(4), || {
        logging::trace_stat!("stat line");
        logging::trace_summary!("summary line");
        logging::trace_job!(job = 3, "job line");
        logging::trace_complete!("complete line");
        logging::trace_pool!("pool line");
        logging::trace_worker!("worker line");
    });

    let flags: Vec<String> = events
        .iter()
        .map(|event| match event {
            DiagnosticEvent::Info { flag, .. } => flag.name().to_owned(),
            DiagnosticEvent::Debug { flag, .. } => flag.name().to_owned(),
        })
        .collect();
    assert_eq!(
        flags,
        ["stat", "summary", "job", "complete", "pool", "worker"]
    );
    assert_eq!(events[2].message(), "job line");
}

#[test]
fn default_verbosity_records_nothing() {
    let events = capture(VerbosityConfig::default(), || {
        logging::trace_stat!("quiet");
        logging::trace_job!("quiet");
    });
    assert!(events.is_empty());
}

#[test]
fn worker_events_need_trace_level() {
    let mut config = VerbosityConfig::default();
    config.debug.set(DebugFlag::Worker, 2);
    let events = capture(config.clone(), || logging::trace_worker!("hidden"));
    assert!(events.is_empty());

    config.debug.set(DebugFlag::Worker, 3);
    let events = capture(config, || logging::trace_worker!("shown"));
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        DiagnosticEvent::Debug { flag: DebugFlag::Worker, level: 3, .. }
    ));
}

#[test]
fn info_flags_do_not_leak_into_debug() {
    let mut config = VerbosityConfig::default();
    config.info.set(InfoFlag::Summary, 1);
    let events = capture(config, || {
        logging::trace_summary!("kept");
        logging::trace_complete!("dropped");
    });
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message(), "kept");
}
