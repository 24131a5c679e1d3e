//! Structured log events for fail-open boundaries.
//!
//! Each function emits a `tracing` event with structured fields.

/// A provider call failed and was dropped from the result.
pub fn provider_failed(provider: &str, kind: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "provider_failed",
        provider = %provider,
        kind = %kind,
        error = %error,
        "provider failed, continuing without it"
    );
}

/// Every provider came back empty; the rule-based fallback answered.
pub fn fallback_activated(conversation_id: &str, providers_failed: usize) {
    tracing::warn!(
        event = "fallback_activated",
        conversation_id = %conversation_id,
        providers_failed = providers_failed,
        "no provider suggestions, using rule-based fallback"
    );
}

/// The cache backing store failed and was bypassed.
pub fn cache_bypassed(key: &str, reason: &str) {
    tracing::warn!(
        event = "cache_bypassed",
        key = %key,
        reason = %reason,
        "cache store unavailable, bypassing"
    );
}

/// A result arrived for a superseded request generation.
pub fn result_superseded(conversation_id: &str, generation: u64, latest: u64) {
    tracing::debug!(
        event = "result_superseded",
        conversation_id = %conversation_id,
        generation = generation,
        latest = latest,
        "discarding stale result"
    );
}

/// A profile read or write against the persistence store failed.
pub fn profile_persistence_failed(user_id: &str, reason: &str) {
    tracing::warn!(
        event = "profile_persistence_failed",
        user_id = %user_id,
        reason = %reason,
        "profile store unavailable, continuing in memory"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a weight update from feedback.
pub fn weight_updated(user_id: &str, provider: &str, old: f64, new: f64) {
    tracing::debug!(
        event = "weight_updated",
        user_id = %user_id,
        provider = %provider,
        old = old,
        new = new,
        "provider weight updated"
    );
}
