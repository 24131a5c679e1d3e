use serde::{Deserialize, Serialize};

use super::defaults;

/// Online learning / profile store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// EMA learning rate applied to provider weights.
    pub learning_rate: f64,
    /// Weight assumed for a provider the profile has never seen.
    pub default_weight: f64,
    /// Maximum profiles held in memory.
    pub max_profiles: usize,
    /// TTL for persisted profiles (seconds).
    pub profile_ttl_secs: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            default_weight: defaults::DEFAULT_PROVIDER_WEIGHT,
            max_profiles: defaults::DEFAULT_MAX_PROFILES,
            profile_ttl_secs: defaults::DEFAULT_PROFILE_TTL_SECS,
        }
    }
}
