//! Engine-wide counters.

mod engine_metrics;

pub use engine_metrics::{EngineMetrics, MetricsSnapshot};
