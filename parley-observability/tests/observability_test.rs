//! Alerting thresholds and tracing initialisation.

use parley_core::models::DegradationEvent;
use parley_observability::tracing_setup::spans::names;
use parley_observability::{
    evaluate_alerts, init_tracing_with_filter, AlertLevel, DegradationTracker,
};

#[test]
fn burst_of_failures_raises_warning() {
    let mut tracker = DegradationTracker::new();
    for _ in 0..4 {
        tracker.record(DegradationEvent::now("provider:neural", "timeout", "empty"));
    }
    tracker.record(DegradationEvent::now("cache", "unavailable", "bypass"));

    let alerts = evaluate_alerts(&tracker);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Warning);
    assert_eq!(alerts[0].component, "provider:neural");
}

#[test]
fn long_running_degradation_is_critical() {
    let mut tracker = DegradationTracker::new();
    let mut event = DegradationEvent::now("provider:predictive", "auth_failure", "empty");
    event.timestamp = chrono::Utc::now() - chrono::Duration::minutes(30);
    tracker.record(event);

    let alerts = evaluate_alerts(&tracker);
    assert_eq!(alerts[0].level, AlertLevel::Critical);

    tracker.mark_recovered("provider:predictive");
    assert!(evaluate_alerts(&tracker).is_empty());
}

#[test]
fn double_init_does_not_panic() {
    let _first = init_tracing_with_filter("debug");
    assert!(!init_tracing_with_filter("info"));
}

#[test]
fn span_macros_use_named_spans() {
    let span = parley_observability::provider_span!("neural");
    let _entered = span.enter();
    assert_eq!(names::PROVIDER, "parley.provider");
    let _cache = parley_observability::cache_span!("abc");
}
