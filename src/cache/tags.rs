//! Tag Index Module
//!
//! Secondary index mapping tags to the set of keys carrying them, enabling
//! bulk invalidation across unrelated keys.
//!
//! The index is owned by the cache store and only mutated alongside the
//! entry map, so a key listed in a bucket always has a live entry and an
//! entry's tags are always listed in their buckets.

use std::collections::{HashMap, HashSet};

// == Tag Index ==
/// Maps each tag to the set of keys currently carrying it.
///
/// Empty buckets are removed as soon as their last key is detached, never
/// left dangling.
#[derive(Debug, Default)]
pub struct TagIndex {
    buckets: HashMap<String, HashSet<String>>,
}

impl TagIndex {
    // == Constructor ==
    /// Creates a new empty tag index.
    pub fn new() -> Self {
        Self::default()
    }

    // == Attach ==
    /// Registers a key under each of the given tags.
    pub fn attach(&mut self, key: &str, tags: &HashSet<String>) {
        for tag in tags {
            self.buckets
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
    }

    // == Detach ==
    /// Removes a key from each of the given tags' buckets.
    ///
    /// Buckets left empty by the removal are dropped.
    pub fn detach(&mut self, key: &str, tags: &HashSet<String>) {
        for tag in tags {
            if let Some(bucket) = self.buckets.get_mut(tag) {
                bucket.remove(key);
                if bucket.is_empty() {
                    self.buckets.remove(tag);
                }
            }
        }
    }

    // == Keys For ==
    /// Returns a snapshot of the keys currently registered under a tag.
    ///
    /// A snapshot is returned rather than a reference so the caller can
    /// delete the keys while iterating.
    pub fn keys_for(&self, tag: &str) -> Vec<String> {
        self.buckets
            .get(tag)
            .map(|bucket| bucket.iter().cloned().collect())
            .unwrap_or_default()
    }

    // == Contains ==
    /// Checks whether a key is registered under a tag.
    #[allow(dead_code)]
    pub fn contains(&self, tag: &str, key: &str) -> bool {
        self.buckets
            .get(tag)
            .map(|bucket| bucket.contains(key))
            .unwrap_or(false)
    }

    // == Bucket Count ==
    /// Returns the number of non-empty buckets.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    // == Clear ==
    /// Drops every bucket.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    // == Iterate ==
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &HashSet<String>)> {
        self.buckets.iter()
    }
}
