use std::time::Duration;

use async_trait::async_trait;

use crate::errors::CacheError;

/// External key-value store used for result and profile durability.
///
/// The engine treats this store as eventually available: every error is
/// logged and handled as a miss.
#[async_trait]
pub trait IKeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`. `ttl = None` means no expiry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>)
        -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
