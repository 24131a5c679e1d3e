//! Record every degradation event: component, failure mode, fallback used,
//! timestamp, recovery status.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parley_core::models::DegradationEvent;
use serde::{Deserialize, Serialize};

/// Events kept before the oldest are dropped.
pub const DEFAULT_MAX_EVENTS: usize = 1024;

/// Recovery status of a degradation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Still in degraded mode.
    Active,
    /// Recovered to normal operation.
    Recovered,
}

/// A tracked degradation event with recovery status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Bounded log of degradation events for alerting and reporting.
#[derive(Debug, Clone)]
pub struct DegradationTracker {
    events: VecDeque<TrackedDegradation>,
    max_events: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_EVENTS)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            events: VecDeque::new(),
            max_events: max_events.max(1),
        }
    }

    /// Record a new degradation event.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        if self.events.len() == self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Mark every active degradation of `component` as recovered.
    /// Returns how many events changed status.
    pub fn mark_recovered(&mut self, component: &str) -> usize {
        let now = Utc::now();
        let mut changed = 0;
        for tracked in self.events.iter_mut() {
            if tracked.event.component == component
                && tracked.recovery_status == RecoveryStatus::Active
            {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(now);
                changed += 1;
            }
        }
        changed
    }

    pub fn events(&self) -> impl Iterator<Item = &TrackedDegradation> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get active (unrecovered) degradations.
    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }

    /// Count events in the last N seconds for a given component.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(window_secs);
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > cutoff)
            .count()
    }

    /// Duration a component has been continuously degraded, or None if not degraded.
    pub fn degraded_duration(&self, component: &str) -> Option<chrono::Duration> {
        let earliest = self
            .events
            .iter()
            .filter(|t| {
                t.event.component == component && t.recovery_status == RecoveryStatus::Active
            })
            .map(|t| t.event.timestamp)
            .min()?;
        Some(Utc::now() - earliest)
    }

    /// Owned copy of the log, oldest first.
    pub fn snapshot(&self) -> Vec<TrackedDegradation> {
        self.events.iter().cloned().collect()
    }
}
