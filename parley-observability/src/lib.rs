//! # parley-observability
//!
//! Structured tracing setup, span macros, degradation tracking with
//! alerting, and lock-free engine metrics.

pub mod degradation;
pub mod metrics;
pub mod tracing_setup;

pub use degradation::{evaluate_alerts, AlertLevel, DegradationAlert, DegradationTracker};
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use tracing_setup::{init_from_config, init_tracing, init_tracing_with_filter};
