//! Cache Store Module
//!
//! Main cache engine combining the entry map with the tag index, size
//! accounting and the eviction policies.
//!
//! Every removal, whatever its cause (explicit delete, lazy expiry, tag
//! invalidation, eviction, sweep), funnels through one internal path that
//! updates the entry map, the tag index and the memory estimate together.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::entry::{current_timestamp_ms, CacheEntry, Priority};
use crate::cache::eviction;
use crate::cache::size::{JsonSizeEstimator, SizeEstimator, FALLBACK_ENTRY_BYTES};
use crate::cache::stats::CacheStats;
use crate::cache::tags::TagIndex;
use crate::config::CacheConfig;

// == Set Options ==
/// Per-entry options for `set`.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// TTL in milliseconds; the cache default applies when absent
    pub ttl_ms: Option<u64>,
    /// Tags to register the entry under
    pub tags: Vec<String>,
    /// Caller-declared priority
    pub priority: Priority,
}

impl SetOptions {
    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

// == Cache Store ==
/// Main cache storage with TTL expiration, tag invalidation and size-aware
/// eviction.
pub struct CacheStore<V> {
    /// Key-value storage; single source of truth for presence
    entries: HashMap<String, CacheEntry<V>>,
    /// Secondary tag index, mutated only alongside `entries`
    tags: TagIndex,
    /// Performance statistics
    stats: CacheStats,
    /// Per-entry size estimation
    estimator: Box<dyn SizeEstimator<V>>,
    /// Running sum of entry charges in bytes
    memory_usage: usize,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    default_ttl_ms: u64,
    /// Estimated-usage level that triggers eviction before inserts
    memory_threshold_bytes: usize,
}

impl<V: Clone + Serialize> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the default JSON size estimator.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_estimator(config, Box::new(JsonSizeEstimator))
    }
}

impl<V: Clone> CacheStore<V> {
    /// Creates a new CacheStore with a caller-supplied size estimator.
    pub fn with_estimator(config: &CacheConfig, estimator: Box<dyn SizeEstimator<V>>) -> Self {
        Self {
            entries: HashMap::new(),
            tags: TagIndex::new(),
            stats: CacheStats::new(),
            estimator,
            memory_usage: 0,
            max_entries: config.max_entries,
            default_ttl_ms: config.default_ttl_ms,
            memory_threshold_bytes: config.memory_threshold_bytes,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A miss is a normal return value: absent keys and expired entries
    /// both return `None`. An expired entry is removed on access together
    /// with its tag memberships; the background sweep is only a safety net
    /// behind this check.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = current_timestamp_ms();

        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_miss();
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.hits += 1;
        self.stats.record_hit();
        Some(entry.value.clone())
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// Replacing an existing key starts a fresh lifecycle: the old entry's
    /// tag memberships are detached before the insert so no stale tag
    /// references leak, and the new entry gets a fresh timestamp and hit
    /// count. Memory-pressure eviction runs before the insert,
    /// count-pressure eviction after it.
    pub fn set(&mut self, key: String, value: V, options: SetOptions) {
        self.remove_entry(&key);

        if self.memory_usage > self.memory_threshold_bytes {
            self.evict_for_memory_pressure();
        }

        let charge = match self.estimator.estimate(&key, &value) {
            Ok(charge) => charge,
            Err(err) => {
                warn!(
                    "Size estimation failed for '{}', charging fallback: {}",
                    key, err
                );
                FALLBACK_ENTRY_BYTES
            }
        };

        let ttl_ms = options.ttl_ms.unwrap_or(self.default_ttl_ms);
        let entry_tags: HashSet<String> = options.tags.into_iter().collect();
        let entry = CacheEntry::new(value, ttl_ms, entry_tags, options.priority, charge);

        self.tags.attach(&key, &entry.tags);
        self.memory_usage += entry.charge;
        self.entries.insert(key, entry);

        if self.entries.len() > self.max_entries {
            self.evict_for_capacity();
        }
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether the key was present. Deleting an absent key is a
    /// no-op, which lets multi-tag invalidation count each entry once.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Invalidate By Tag ==
    /// Deletes every entry currently registered under a tag.
    ///
    /// Returns the number of entries removed. The emptied bucket is dropped
    /// from the tag index.
    pub fn invalidate_by_tag(&mut self, tag: &str) -> usize {
        let keys = self.tags.keys_for(tag);
        let mut removed = 0;
        for key in keys {
            if self.delete(&key) {
                removed += 1;
            }
        }
        removed
    }

    /// Deletes every entry registered under any of the given tags.
    ///
    /// Entries carrying several of the tags are removed and counted once.
    pub fn invalidate_by_tags(&mut self, tags: &[&str]) -> usize {
        tags.iter().map(|tag| self.invalidate_by_tag(tag)).sum()
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            self.remove_entry(&key);
        }
        count
    }

    // == Clear ==
    /// Drops every entry and tag bucket and resets all counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.tags.clear();
        self.memory_usage = 0;
        self.stats = CacheStats::new();
    }

    // == Stats ==
    /// Returns a snapshot of current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.memory_usage_bytes = self.memory_usage;
        stats
    }

    // == Peek ==
    /// Returns an entry without touching hit counts or statistics.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Memory Usage ==
    /// Returns the current estimated memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }

    // == Eviction ==
    /// Sheds the bottom quarter of entries by hit-per-age score.
    fn evict_for_memory_pressure(&mut self) {
        let now = current_timestamp_ms();
        let victims = eviction::select_for_memory_pressure(&self.entries, now);
        let count = victims.len();

        for key in victims {
            if self.remove_entry(&key).is_some() {
                self.stats.record_eviction();
            }
        }

        if count > 0 {
            debug!("Memory pressure: evicted {} low-value entries", count);
        }
    }

    /// Sheds the lowest-recency entries until the count fits again.
    fn evict_for_capacity(&mut self) {
        let victims = eviction::select_for_capacity(&self.entries, self.max_entries);
        let count = victims.len();

        for key in victims {
            if self.remove_entry(&key).is_some() {
                self.stats.record_eviction();
            }
        }

        if count > 0 {
            debug!("Capacity: evicted {} entries over the limit", count);
        }
    }

    // == Remove Entry ==
    /// Single removal path: detaches tag memberships and releases the
    /// entry's memory charge together with the entry itself.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.tags.detach(key, &entry.tags);
        self.memory_usage = self.memory_usage.saturating_sub(entry.charge);
        Some(entry)
    }

    // == Test Accessors ==
    #[cfg(test)]
    pub(crate) fn entries(&self) -> &HashMap<String, CacheEntry<V>> {
        &self.entries
    }

    #[cfg(test)]
    pub(crate) fn tag_index(&self) -> &TagIndex {
        &self.tags
    }
}
