//! InMemoryKvStore: concurrent key-value store with per-entry expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use parley_core::errors::CacheError;
use parley_core::traits::IKeyValueStore;
use tracing::trace;

#[derive(Debug, Clone)]
struct StoredValue {
    bytes: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Thread-safe store backed by `DashMap`. Expired entries are dropped lazily
/// on read and eagerly by [`purge_expired`](Self::purge_expired).
#[derive(Debug, Clone, Default)]
pub struct InMemoryKvStore {
    entries: Arc<DashMap<String, StoredValue>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|v| !v.is_expired(Instant::now()))
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, v| !v.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|r| r.key().clone()).collect()
    }
}

#[async_trait]
impl IKeyValueStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(v) if !v.is_expired(now) => return Ok(Some(v.bytes.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            // Guard dropped above; remove only if still expired.
            self.entries.remove_if(key, |_, v| v.is_expired(now));
            trace!(key, "expired entry removed on read");
        }
        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let expires_at = ttl.and_then(|t| Instant::now().checked_add(t));
        self.entries.insert(
            key.to_string(),
            StoredValue {
                bytes: value,
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);
        store.set("a", b"1".to_vec(), None).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"1".to_vec()));
        store.set("a", b"2".to_vec(), None).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"2".to_vec()));
        store.delete("a").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let store = InMemoryKvStore::new();
        store
            .set("short", b"x".to_vec(), Some(Duration::from_millis(20)))
            .await
            .unwrap();
        store.set("long", b"y".to_vec(), None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(!store.contains_key("short"));
        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("long").await.unwrap(), Some(b"y".to_vec()));
    }

    #[tokio::test]
    async fn purge_counts_removed() {
        let store = InMemoryKvStore::new();
        for i in 0..3 {
            store
                .set(&format!("k{i}"), vec![i], Some(Duration::from_millis(1)))
                .await
                .unwrap();
        }
        store.set("keep", vec![9], None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(store.purge_expired(), 3);
        assert_eq!(store.keys(), vec!["keep".to_string()]);
    }
}
