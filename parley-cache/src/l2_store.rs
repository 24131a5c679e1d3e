//! L2 write-through to the external key-value store.
//!
//! Entries are JSON-encoded [`CacheEntry`] records under `result:{key}`.
//! Errors are returned to the caller, which degrades them to a bypass.

use std::sync::Arc;
use std::time::Duration;

use parley_core::constants::RESULT_KEY_PREFIX;
use parley_core::errors::CacheError;
use parley_core::models::{AggregatedResult, CacheEntry};
use parley_core::traits::IKeyValueStore;

#[derive(Clone)]
pub struct L2StoreCache {
    store: Arc<dyn IKeyValueStore>,
    ttl: Duration,
}

impl L2StoreCache {
    pub fn new(store: Arc<dyn IKeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn storage_key(key: &str) -> String {
        format!("{RESULT_KEY_PREFIX}{key}")
    }

    /// Unexpired result for `key`, if any.
    pub async fn get(&self, key: &str) -> Result<Option<AggregatedResult>, CacheError> {
        let Some(bytes) = self.store.get(&Self::storage_key(key)).await? else {
            return Ok(None);
        };
        let entry: CacheEntry =
            serde_json::from_slice(&bytes).map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;
        if entry.is_expired() || entry.key != key {
            return Ok(None);
        }
        Ok(Some(entry.result))
    }

    pub async fn put(&self, key: &str, result: &AggregatedResult) -> Result<(), CacheError> {
        let entry = CacheEntry::new(key, result.clone());
        let bytes = serde_json::to_vec(&entry).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        self.store
            .set(&Self::storage_key(key), bytes, Some(self.ttl))
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(&Self::storage_key(key)).await
    }
}
