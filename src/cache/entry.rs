//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL, tag and
//! hit-count metadata.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

// == Priority ==
/// Caller-declared importance of an entry.
///
/// Stored on the entry for inspection by callers; the eviction scores are
/// driven by hits and age, not priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Number of times the entry has been read
    pub hits: u64,
    /// Tags this entry is registered under in the tag index
    pub tags: HashSet<String>,
    /// Caller-declared priority
    pub priority: Priority,
    /// Estimated memory footprint in bytes, fixed at insert time
    pub charge: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(
        value: V,
        ttl_ms: u64,
        tags: HashSet<String>,
        priority: Priority,
        charge: usize,
    ) -> Self {
        Self {
            value,
            created_at: current_timestamp_ms(),
            ttl_ms,
            hits: 0,
            tags,
            priority,
            charge,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived its TTL.
    ///
    /// Boundary condition: an entry is expired once the time elapsed since
    /// creation is strictly greater than the TTL, so an entry read exactly
    /// at the TTL mark is still a hit.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at) > self.ttl_ms
    }

    // == Age ==
    /// Returns the entry's age in minutes at the given instant.
    pub fn age_minutes(&self, now_ms: u64) -> f64 {
        now_ms.saturating_sub(self.created_at) as f64 / 60_000.0
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds.
    ///
    /// Useful for debugging and statistics surfaces.
    ///
    /// # Returns
    /// - `0` if the entry has expired
    /// - the remaining milliseconds otherwise
    pub fn ttl_remaining_ms(&self) -> u64 {
        let expires_at = self.created_at.saturating_add(self.ttl_ms);
        expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
