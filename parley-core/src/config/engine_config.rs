use serde::{Deserialize, Serialize};

use super::defaults;

/// Request-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on suggestions returned per request.
    pub max_suggestions: usize,
    /// Deadline for the whole provider fan-out (milliseconds).
    pub global_deadline_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_suggestions: defaults::DEFAULT_MAX_SUGGESTIONS,
            global_deadline_ms: defaults::DEFAULT_GLOBAL_DEADLINE_MS,
        }
    }
}
