//! Span definitions per operation: suggest, fan-out, provider call, ranking,
//! learning, cache.

/// Create a span for one suggestion request.
#[macro_export]
macro_rules! suggest_span {
    ($user_id:expr, $conversation_id:expr, $generation:expr) => {
        tracing::info_span!(
            "parley.suggest",
            user_id = %$user_id,
            conversation_id = %$conversation_id,
            generation = $generation
        )
    };
}

/// Create a fan-out span.
#[macro_export]
macro_rules! fanout_span {
    ($providers:expr, $short_circuit:expr) => {
        tracing::info_span!(
            "parley.fanout",
            providers = $providers,
            short_circuit = $short_circuit
        )
    };
}

/// Create a span for a single provider call.
#[macro_export]
macro_rules! provider_span {
    ($provider:expr) => {
        tracing::info_span!("parley.provider", provider = %$provider)
    };
}

/// Create a ranking span.
#[macro_export]
macro_rules! ranking_span {
    ($candidates:expr) => {
        tracing::debug_span!("parley.ranking", candidates = $candidates)
    };
}

/// Create a learning span.
#[macro_export]
macro_rules! learning_span {
    ($user_id:expr, $provider:expr) => {
        tracing::info_span!("parley.learning", user_id = %$user_id, provider = %$provider)
    };
}

/// Create a cache span.
#[macro_export]
macro_rules! cache_span {
    ($key:expr) => {
        tracing::debug_span!("parley.cache", key = %$key)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SUGGEST: &str = "parley.suggest";
    pub const FANOUT: &str = "parley.fanout";
    pub const PROVIDER: &str = "parley.provider";
    pub const RANKING: &str = "parley.ranking";
    pub const LEARNING: &str = "parley.learning";
    pub const CACHE: &str = "parley.cache";
}
