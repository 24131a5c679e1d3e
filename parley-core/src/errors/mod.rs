//! Error taxonomy. One enum per subsystem, unified under [`ParleyError`].

mod aggregation_error;
mod cache_error;
mod parse_error;
mod profile_error;
mod provider_error;

pub use aggregation_error::AggregationError;
pub use cache_error::CacheError;
pub use parse_error::ParseError;
pub use profile_error::ProfileError;
pub use provider_error::{ProviderError, ProviderErrorKind};

/// Top-level engine error.
#[derive(Debug, thiserror::Error)]
pub enum ParleyError {
    #[error(transparent)]
    ProviderError(#[from] ProviderError),

    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error(transparent)]
    CacheError(#[from] CacheError),

    #[error(transparent)]
    ProfileError(#[from] ProfileError),

    #[error(transparent)]
    AggregationError(#[from] AggregationError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ParleyError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

pub type ParleyResult<T> = Result<T, ParleyError>;
