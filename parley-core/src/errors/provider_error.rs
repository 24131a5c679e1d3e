use serde::{Deserialize, Serialize};

use super::ParseError;

/// Classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    Timeout,
    AuthFailure,
    RateLimited,
    MalformedResponse,
    NetworkError,
}

impl ProviderErrorKind {
    pub const ALL: [ProviderErrorKind; 5] = [
        Self::Timeout,
        Self::AuthFailure,
        Self::RateLimited,
        Self::MalformedResponse,
        Self::NetworkError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::AuthFailure => "auth_failure",
            Self::RateLimited => "rate_limited",
            Self::MalformedResponse => "malformed_response",
            Self::NetworkError => "network_error",
        }
    }
}

/// Suggestion provider errors. Caught at the gateway boundary, never
/// propagated to callers of the engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("provider {provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("provider {provider} rejected credentials: {reason}")]
    AuthFailure { provider: String, reason: String },

    #[error("provider {provider} rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited {
        provider: String,
        retry_after_ms: Option<u64>,
    },

    #[error("provider {provider} returned a malformed response: {source}")]
    MalformedResponse {
        provider: String,
        #[source]
        source: ParseError,
    },

    #[error("provider {provider} network error: {reason}")]
    NetworkError { provider: String, reason: String },
}

impl ProviderError {
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Timeout { .. } => ProviderErrorKind::Timeout,
            Self::AuthFailure { .. } => ProviderErrorKind::AuthFailure,
            Self::RateLimited { .. } => ProviderErrorKind::RateLimited,
            Self::MalformedResponse { .. } => ProviderErrorKind::MalformedResponse,
            Self::NetworkError { .. } => ProviderErrorKind::NetworkError,
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            Self::Timeout { provider, .. }
            | Self::AuthFailure { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::MalformedResponse { provider, .. }
            | Self::NetworkError { provider, .. } => provider,
        }
    }
}
