//! Engine configuration.
//!
//! Every section is `#[serde(default)]`, so an empty TOML document yields the
//! full default configuration and partial documents override only the keys
//! they name.

pub mod cache_config;
pub mod context_config;
pub mod defaults;
pub mod engine_config;
pub mod gateway_config;
pub mod learning_config;
pub mod observability_config;
pub mod ranking_config;

pub use cache_config::CacheConfig;
pub use context_config::ContextConfig;
pub use engine_config::EngineConfig;
pub use gateway_config::{GatewayConfig, ShortCircuitConfig};
pub use learning_config::LearningConfig;
pub use observability_config::ObservabilityConfig;
pub use ranking_config::RankingConfig;

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ParleyError, ParleyResult};

/// Top-level configuration for the suggestion engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    pub engine: EngineConfig,
    pub gateway: GatewayConfig,
    pub ranking: RankingConfig,
    pub learning: LearningConfig,
    pub cache: CacheConfig,
    pub context: ContextConfig,
    pub observability: ObservabilityConfig,
}

impl ParleyConfig {
    /// Parse a TOML document. Missing sections and keys fall back to defaults.
    pub fn from_toml(input: &str) -> ParleyResult<Self> {
        toml::from_str(input).map_err(|e| ParleyError::ConfigError(e.to_string()))
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> ParleyResult<String> {
        toml::to_string(self).map_err(|e| ParleyError::SerializationError(e.to_string()))
    }

    /// Reject configurations the engine cannot honour.
    pub fn validate(&self) -> ParleyResult<()> {
        fn fail(msg: impl Into<String>) -> ParleyResult<()> {
            Err(ParleyError::ConfigError(msg.into()))
        }

        if self.engine.max_suggestions == 0 {
            return fail("engine.max_suggestions must be at least 1");
        }
        if self.engine.global_deadline_ms == 0 {
            return fail("engine.global_deadline_ms must be positive");
        }
        if self.gateway.per_provider_timeout_ms == 0 {
            return fail("gateway.per_provider_timeout_ms must be positive");
        }
        if self.gateway.short_circuit.enabled && self.gateway.short_circuit.threshold == 0 {
            return fail("gateway.short_circuit.threshold must be at least 1 when enabled");
        }

        let mut seen = HashSet::new();
        for tier in &self.gateway.provider_priority_tiers {
            for id in tier {
                if !seen.insert(id.as_str()) {
                    return fail(format!(
                        "provider '{id}' appears in more than one priority tier"
                    ));
                }
            }
        }

        let unit = |v: f64| (0.0..=1.0).contains(&v);
        if !unit(self.ranking.consensus_boost) {
            return fail("ranking.consensus_boost must be within [0, 1]");
        }
        if !unit(self.ranking.alignment_threshold) {
            return fail("ranking.alignment_threshold must be within [0, 1]");
        }
        if !unit(self.ranking.fallback_confidence) {
            return fail("ranking.fallback_confidence must be within [0, 1]");
        }
        if self.ranking.relevance_weight < 0.0 || self.ranking.personality_boost < 0.0 {
            return fail("ranking weights must be non-negative");
        }
        if !(self.learning.learning_rate > 0.0 && self.learning.learning_rate <= 1.0) {
            return fail("learning.learning_rate must be within (0, 1]");
        }
        if !unit(self.learning.default_weight) {
            return fail("learning.default_weight must be within [0, 1]");
        }
        if self.learning.max_profiles == 0 {
            return fail("learning.max_profiles must be at least 1");
        }
        if self.cache.ttl_ms == 0 {
            return fail("cache.ttl_ms must be positive");
        }
        if self.context.window_capacity == 0 {
            return fail("context.window_capacity must be at least 1");
        }
        if self.context.max_conversations == 0 {
            return fail("context.max_conversations must be at least 1");
        }
        Ok(())
    }

    pub fn per_provider_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway.per_provider_timeout_ms)
    }

    pub fn global_deadline(&self) -> Duration {
        Duration::from_millis(self.engine.global_deadline_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache.ttl_ms)
    }
}
