use serde::{Deserialize, Serialize};

use super::defaults;

/// Provider gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Timeout applied to each individual provider call (milliseconds).
    pub per_provider_timeout_ms: u64,
    /// Provider ids grouped into priority tiers, highest priority first.
    /// Registered providers missing from every tier form an implicit last tier.
    pub provider_priority_tiers: Vec<Vec<String>>,
    /// Skip lower tiers once enough suggestions were collected.
    pub short_circuit: ShortCircuitConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            per_provider_timeout_ms: defaults::DEFAULT_PER_PROVIDER_TIMEOUT_MS,
            provider_priority_tiers: vec![
                vec!["neural".to_string()],
                vec!["personality".to_string(), "pattern".to_string()],
                vec!["predictive".to_string()],
            ],
            short_circuit: ShortCircuitConfig::default(),
        }
    }
}

/// Tier short-circuit settings.
///
/// When enabled, tiers are resolved one after another and lower tiers are
/// skipped once the cumulative suggestion count reaches `threshold`. When
/// disabled, every tier is fanned out at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortCircuitConfig {
    pub enabled: bool,
    pub threshold: usize,
}

impl Default for ShortCircuitConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_SHORT_CIRCUIT_ENABLED,
            threshold: defaults::DEFAULT_SHORT_CIRCUIT_THRESHOLD,
        }
    }
}
