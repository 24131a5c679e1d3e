/// Parley engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum messages retained in a conversation window.
pub const CONTEXT_WINDOW_CAPACITY: usize = 10;

/// Provider id used for suggestions produced by the rule-based fallback.
pub const FALLBACK_PROVIDER_ID: &str = "rule-based";

/// Key prefix for persisted user profiles.
pub const PROFILE_KEY_PREFIX: &str = "profile:";

/// Key prefix for persisted aggregated results.
pub const RESULT_KEY_PREFIX: &str = "result:";

/// Feature flags.
pub const FEATURE_RESULT_L2: bool = true;
pub const FEATURE_PROFILE_PERSISTENCE: bool = true;
