//! Alert thresholds: >3 degradations of one component in a minute → warning,
//! same component continuously degraded >10 minutes → critical.

use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

const BURST_WINDOW_SECS: i64 = 60;
const BURST_THRESHOLD: usize = 3;
const CRITICAL_AFTER_MINUTES: i64 = 10;

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

/// A degradation alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub component: String,
    pub message: String,
}

/// Evaluate alerts based on the current degradation tracker state.
pub fn evaluate_alerts(tracker: &DegradationTracker) -> Vec<DegradationAlert> {
    let mut alerts = Vec::new();
    let mut seen_components = std::collections::HashSet::new();

    for tracked in tracker.events() {
        let component = &tracked.event.component;
        if !seen_components.insert(component.clone()) {
            continue;
        }

        if let Some(duration) = tracker.degraded_duration(component) {
            if duration > chrono::Duration::minutes(CRITICAL_AFTER_MINUTES) {
                alerts.push(DegradationAlert {
                    level: AlertLevel::Critical,
                    component: component.clone(),
                    message: format!(
                        "{} has been degraded for over {} minutes",
                        component, CRITICAL_AFTER_MINUTES
                    ),
                });
                continue;
            }
        }

        let recent_count = tracker.count_recent(component, BURST_WINDOW_SECS);
        if recent_count > BURST_THRESHOLD {
            alerts.push(DegradationAlert {
                level: AlertLevel::Warning,
                component: component.clone(),
                message: format!(
                    "{} has {} degradation events in the last minute",
                    component, recent_count
                ),
            });
        }
    }

    alerts
}
