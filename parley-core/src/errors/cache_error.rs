/// Result cache and key-value store errors. Always degraded to a cache bypass.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("cache entry could not be (de)serialized: {reason}")]
    Serialization { reason: String },
}
