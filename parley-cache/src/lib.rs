//! # parley-cache
//!
//! Result cache for aggregated suggestions.
//!
//! L1 is an in-process moka cache (LRU eviction, TTL expiry) whose entry
//! API coalesces concurrent computations for one key. L2 is an optional
//! write-through to the external key-value store; every L2 failure is
//! logged and treated as a miss.

pub mod key;
pub mod l1_memory;
pub mod l2_store;
pub mod result_cache;

pub use key::CacheKey;
pub use l1_memory::L1MemoryCache;
pub use l2_store::L2StoreCache;
pub use result_cache::{CacheHitTier, CacheLookup, CacheStats, ResultCache};
