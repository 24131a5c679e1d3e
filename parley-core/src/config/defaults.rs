// Single source of truth for all default values.

// --- Engine ---
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
pub const DEFAULT_GLOBAL_DEADLINE_MS: u64 = 2_000;

// --- Gateway ---
pub const DEFAULT_PER_PROVIDER_TIMEOUT_MS: u64 = 800;
pub const DEFAULT_SHORT_CIRCUIT_ENABLED: bool = false;
pub const DEFAULT_SHORT_CIRCUIT_THRESHOLD: usize = 5;

// --- Ranking ---
pub const DEFAULT_CONSENSUS_BOOST: f64 = 0.1;
pub const DEFAULT_RELEVANCE_WEIGHT: f64 = 0.2;
pub const DEFAULT_PERSONALITY_BOOST: f64 = 0.15;
pub const DEFAULT_ALIGNMENT_THRESHOLD: f64 = 0.6;
pub const DEFAULT_FALLBACK_CONFIDENCE: f64 = 0.5;

// --- Learning ---
pub const DEFAULT_LEARNING_RATE: f64 = 0.05;
pub const DEFAULT_PROVIDER_WEIGHT: f64 = 1.0;
pub const DEFAULT_PATTERN_AFFINITY: f64 = 0.5;
pub const DEFAULT_MAX_PROFILES: usize = 10_000;
pub const DEFAULT_PROFILE_TTL_SECS: u64 = 30 * 24 * 3600; // 30 days

// --- Cache ---
pub const DEFAULT_CACHE_CAPACITY: u64 = 1_000;
pub const DEFAULT_CACHE_TTL_MS: u64 = 5 * 60 * 1_000; // 5 minutes
pub const DEFAULT_CACHE_SWEEP_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_CACHE_L2_ENABLED: bool = false;

// --- Context ---
pub const DEFAULT_WINDOW_CAPACITY: usize = crate::constants::CONTEXT_WINDOW_CAPACITY;
pub const DEFAULT_MAX_CONVERSATIONS: usize = 10_000;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 3_600; // 1 hour

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
