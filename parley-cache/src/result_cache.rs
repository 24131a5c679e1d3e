//! ResultCache: L1 → L2 → compute, single-flight per key.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parley_core::config::CacheConfig;
use parley_core::models::AggregatedResult;
use parley_core::traits::IKeyValueStore;
use parley_observability::cache_span;
use parley_observability::tracing_setup::events;
use tokio::task::JoinHandle;
use tracing::{debug, Instrument};

use crate::key::CacheKey;
use crate::l1_memory::L1MemoryCache;
use crate::l2_store::L2StoreCache;

/// Where a lookup was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHitTier {
    L1,
    L2,
    /// Neither tier had it; this caller (or a coalesced peer) computed it.
    Computed,
}

#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub result: Arc<AggregatedResult>,
    pub tier: CacheHitTier,
    /// True when at least one L2 operation failed during this lookup.
    pub bypassed: bool,
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        self.tier != CacheHitTier::Computed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub misses: u64,
    pub bypasses: u64,
}

#[derive(Default)]
struct Counters {
    l1_hits: AtomicU64,
    l2_hits: AtomicU64,
    misses: AtomicU64,
    bypasses: AtomicU64,
}

/// Two-tier result cache.
pub struct ResultCache {
    l1: L1MemoryCache,
    l2: Option<L2StoreCache>,
    counters: Arc<Counters>,
}

impl ResultCache {
    /// L1 only.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            l1: L1MemoryCache::new(config.capacity, Duration::from_millis(config.ttl_ms)),
            l2: None,
            counters: Arc::new(Counters::default()),
        }
    }

    /// L1 plus write-through to `store`, if `config.l2_enabled`.
    pub fn with_store(config: &CacheConfig, store: Arc<dyn IKeyValueStore>) -> Self {
        let mut cache = Self::new(config);
        if config.l2_enabled {
            cache.l2 = Some(L2StoreCache::new(store, Duration::from_millis(config.ttl_ms)));
        }
        cache
    }

    pub fn ttl(&self) -> Duration {
        self.l1.ttl()
    }

    pub fn has_l2(&self) -> bool {
        self.l2.is_some()
    }

    /// Return the cached result for `key`, or run `compute` exactly once
    /// across every concurrent caller sharing that key.
    pub async fn get_or_compute<F, Fut>(&self, key: &CacheKey, compute: F) -> CacheLookup
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AggregatedResult>,
    {
        let span = cache_span!(key);
        async {
            if let Some(result) = self.l1.get(key.as_str()).await {
                self.counters.l1_hits.fetch_add(1, Ordering::Relaxed);
                return CacheLookup {
                    result,
                    tier: CacheHitTier::L1,
                    bypassed: false,
                };
            }

            let mut tier = CacheHitTier::Computed;
            let mut bypassed = false;
            let entry = self
                .l1
                .inner()
                .entry(key.as_str().to_string())
                .or_insert_with(async {
                    if let Some(found) = self.read_l2(key, &mut bypassed).await {
                        tier = CacheHitTier::L2;
                        return Arc::new(found);
                    }
                    let computed = compute().await;
                    self.write_l2(key, &computed, &mut bypassed).await;
                    Arc::new(computed)
                })
                .await;

            if !entry.is_fresh() {
                // Another caller filled the slot while we waited.
                tier = CacheHitTier::L1;
            }
            match tier {
                CacheHitTier::L1 => self.counters.l1_hits.fetch_add(1, Ordering::Relaxed),
                CacheHitTier::L2 => self.counters.l2_hits.fetch_add(1, Ordering::Relaxed),
                CacheHitTier::Computed => self.counters.misses.fetch_add(1, Ordering::Relaxed),
            };
            debug!(?tier, "cache lookup");
            CacheLookup {
                result: entry.into_value(),
                tier,
                bypassed,
            }
        }
        .instrument(span)
        .await
    }

    async fn read_l2(&self, key: &CacheKey, bypassed: &mut bool) -> Option<AggregatedResult> {
        let l2 = self.l2.as_ref()?;
        match l2.get(key.as_str()).await {
            Ok(found) => found,
            Err(e) => {
                self.bypass(key, &e.to_string());
                *bypassed = true;
                None
            }
        }
    }

    async fn write_l2(&self, key: &CacheKey, result: &AggregatedResult, bypassed: &mut bool) {
        let Some(l2) = self.l2.as_ref() else {
            return;
        };
        if let Err(e) = l2.put(key.as_str(), result).await {
            self.bypass(key, &e.to_string());
            *bypassed = true;
        }
    }

    fn bypass(&self, key: &CacheKey, reason: &str) {
        self.counters.bypasses.fetch_add(1, Ordering::Relaxed);
        events::cache_bypassed(key.as_str(), reason);
    }

    /// Drop `key` from both tiers.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.l1.invalidate(key.as_str()).await;
        if let Some(l2) = &self.l2 {
            if let Err(e) = l2.delete(key.as_str()).await {
                self.bypass(key, &e.to_string());
            }
        }
    }

    pub fn clear(&self) {
        self.l1.clear();
    }

    pub fn len(&self) -> u64 {
        self.l1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l1.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_hits: self.counters.l1_hits.load(Ordering::Relaxed),
            l2_hits: self.counters.l2_hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            bypasses: self.counters.bypasses.load(Ordering::Relaxed),
        }
    }

    /// Run expiry and eviction housekeeping now.
    pub async fn run_pending_tasks(&self) {
        self.l1.run_pending_tasks().await;
    }

    /// Periodic housekeeping. The task exits once the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = weak.upgrade() else {
                    debug!("result cache dropped, sweeper exiting");
                    break;
                };
                cache.run_pending_tasks().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(text: &str) -> AggregatedResult {
        use parley_core::models::{Suggestion, SuggestionSource};
        AggregatedResult {
            suggestions: vec![Suggestion::new(text, 0.8, SuggestionSource::Neural)],
            overall_confidence: 0.8,
            low_confidence: false,
            cache_key: "k".into(),
            expires_at: Utc::now() + chrono::Duration::minutes(5),
        }
    }

    #[tokio::test]
    async fn second_lookup_hits_l1() {
        let cache = ResultCache::new(&CacheConfig::default());
        let key = CacheKey::new("u", "c", "hi", "es");
        let first = cache.get_or_compute(&key, || async { result("hola") }).await;
        assert_eq!(first.tier, CacheHitTier::Computed);
        let second = cache
            .get_or_compute(&key, || async { result("other") })
            .await;
        assert_eq!(second.tier, CacheHitTier::L1);
        assert!(Arc::ptr_eq(&first.result, &second.result));
        assert_eq!(
            cache.stats(),
            CacheStats {
                l1_hits: 1,
                misses: 1,
                ..CacheStats::default()
            }
        );
    }

    #[tokio::test]
    async fn sweeper_stops_when_cache_dropped() {
        let cache = Arc::new(ResultCache::new(&CacheConfig::default()));
        let handle = cache.spawn_sweeper(Duration::from_millis(5));
        drop(cache);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should exit")
            .unwrap();
    }
}
