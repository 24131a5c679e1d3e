use serde::{Deserialize, Serialize};

use super::defaults;

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached results (LRU eviction beyond this).
    pub capacity: u64,
    /// Time-to-live of a cached result (milliseconds).
    pub ttl_ms: u64,
    /// Interval between maintenance sweeps (milliseconds).
    pub sweep_interval_ms: u64,
    /// Write results through to the external key-value store.
    pub l2_enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::DEFAULT_CACHE_CAPACITY,
            ttl_ms: defaults::DEFAULT_CACHE_TTL_MS,
            sweep_interval_ms: defaults::DEFAULT_CACHE_SWEEP_INTERVAL_MS,
            l2_enabled: defaults::DEFAULT_CACHE_L2_ENABLED,
        }
    }
}
