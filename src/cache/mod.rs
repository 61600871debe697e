//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, tag-based invalidation
//! and eviction under memory and entry-count pressure.

mod entry;
mod eviction;
mod shared;
mod size;
mod stats;
mod store;
mod tags;


// Re-export public types
pub use entry::{CacheEntry, Priority};
pub use eviction::{HIT_RECENCY_BONUS_MS, MEMORY_EVICTION_FRACTION};
pub use shared::TagCache;
pub use size::{JsonSizeEstimator, SizeEstimator, ENTRY_OVERHEAD_BYTES, FALLBACK_ENTRY_BYTES};
pub use stats::CacheStats;
pub use store::{CacheStore, SetOptions};
