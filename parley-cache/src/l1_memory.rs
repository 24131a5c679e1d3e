//! L1 in-memory cache using moka.
//!
//! LRU eviction beyond capacity. Regular results live for the configured
//! TTL; low-confidence fallback results expire sooner so recovered
//! providers are consulted again quickly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use moka::Expiry;
use parley_core::models::AggregatedResult;

/// Fallback results live for this fraction of the regular TTL.
const FALLBACK_TTL_DIVISOR: u32 = 10;

struct ResultExpiry {
    ttl: Duration,
    fallback_ttl: Duration,
}

impl Expiry<String, Arc<AggregatedResult>> for ResultExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<AggregatedResult>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(if value.low_confidence {
            self.fallback_ttl
        } else {
            self.ttl
        })
    }
}

/// L1 result cache keyed by [`crate::CacheKey`] hex digests.
#[derive(Clone)]
pub struct L1MemoryCache {
    cache: Cache<String, Arc<AggregatedResult>>,
    ttl: Duration,
}

impl L1MemoryCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .expire_after(ResultExpiry {
                ttl,
                fallback_ttl: ttl / FALLBACK_TTL_DIVISOR,
            })
            .build();
        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub(crate) fn inner(&self) -> &Cache<String, Arc<AggregatedResult>> {
        &self.cache
    }

    pub async fn get(&self, key: &str) -> Option<Arc<AggregatedResult>> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: String, value: Arc<AggregatedResult>) {
        self.cache.insert(key, value).await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Approximate; pending maintenance is not reflected until it runs.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}
