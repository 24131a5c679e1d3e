//! Requests, cache outcomes, provider errors by kind, fallbacks, superseded
//! results, skipped providers.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parley_core::errors::ProviderErrorKind;
use serde::{Deserialize, Serialize};

/// Lock-free counters shared by every request.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    cache_bypasses: AtomicU64,
    provider_calls: AtomicU64,
    provider_errors: [AtomicU64; 5],
    fallbacks: AtomicU64,
    superseded: AtomicU64,
    skipped_providers: AtomicU64,
    deadline_hits: AtomicU64,
    feedback_events: AtomicU64,
    total_latency_us: AtomicU64,
}

fn kind_index(kind: ProviderErrorKind) -> usize {
    ProviderErrorKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(0)
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, latency: Duration) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_bypass(&self) {
        self.cache_bypasses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_call(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_error(&self, kind: ProviderErrorKind) {
        self.provider_errors[kind_index(kind)].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_superseded(&self) {
        self.superseded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self, count: usize) {
        self.skipped_providers
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_deadline_hit(&self) {
        self.deadline_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_feedback(&self) {
        self.feedback_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        let requests = load(&self.requests);
        let avg_latency_us = if requests == 0 {
            0
        } else {
            load(&self.total_latency_us) / requests
        };
        MetricsSnapshot {
            requests,
            cache_hits: load(&self.cache_hits),
            cache_misses: load(&self.cache_misses),
            cache_bypasses: load(&self.cache_bypasses),
            provider_calls: load(&self.provider_calls),
            provider_errors: ProviderErrorKind::ALL
                .iter()
                .zip(&self.provider_errors)
                .map(|(kind, count)| (kind.as_str().to_string(), load(count)))
                .collect(),
            fallbacks: load(&self.fallbacks),
            superseded: load(&self.superseded),
            skipped_providers: load(&self.skipped_providers),
            deadline_hits: load(&self.deadline_hits),
            feedback_events: load(&self.feedback_events),
            avg_latency_us,
        }
    }
}

/// Point-in-time copy of [`EngineMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_bypasses: u64,
    pub provider_calls: u64,
    /// Keyed by error kind name.
    pub provider_errors: BTreeMap<String, u64>,
    pub fallbacks: u64,
    pub superseded: u64,
    pub skipped_providers: u64,
    pub deadline_hits: u64,
    pub feedback_events: u64,
    pub avg_latency_us: u64,
}

impl MetricsSnapshot {
    pub fn total_provider_errors(&self) -> u64 {
        self.provider_errors.values().sum()
    }

    /// Fraction of cache lookups served from cache.
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}
