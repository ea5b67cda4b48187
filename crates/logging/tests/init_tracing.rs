//! The default subscriber prints diagnostics without buffering them.
//!
//! Installs a global subscriber, so this file holds a single test.

#![cfg(feature = "tracing")]

use logging::{VerbosityConfig, drain_events, init_tracing};

#[test]
fn installed_subscriber_records_nothing_per_thread() {
    init_tracing(VerbosityConfig::from_verbose_level(4)).unwrap();
    drain_events();

    for i in 0..64 {
        logging::trace_job!(job = i, "created");
        logging::trace_complete!("normalized");
    }
    let elsewhere = std::thread::spawn(|| {
        logging::trace_worker!("stat");
        drain_events().len()
    })
    .join()
    .unwrap();

    assert_eq!(elsewhere, 0);
    assert!(drain_events().is_empty());
    assert!(init_tracing(VerbosityConfig::default()).is_err());
}
