//! Tagcache - An in-process cache with TTL and tag-based invalidation
//!
//! Provides a shared, thread-safe cache with lazy and background TTL
//! expiration, bulk invalidation by tag, and eviction under memory and
//! entry-count pressure.

pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod tasks;
pub mod warmup;

pub use cache::{
    CacheEntry, CacheStats, CacheStore, JsonSizeEstimator, Priority, SetOptions, SizeEstimator,
    TagCache,
};
pub use config::CacheConfig;
pub use error::CacheError;
pub use keys::generate_key;
pub use tasks::spawn_sweep_task;
pub use warmup::{WarmRecord, WarmUpSource};
