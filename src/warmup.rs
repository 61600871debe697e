//! Warm-Up Module
//!
//! Bulk-preload seam for external collaborators that can enumerate the
//! records worth caching ahead of demand (active tenants, hot queries).
//!
//! The cache pulls through [`WarmUpSource`] and applies one TTL to the
//! whole batch; a failing source is logged by the cache and never stops it
//! from serving.

use anyhow::Result;

// == Warm Record ==
/// A record offered by a warm-up source.
#[derive(Debug, Clone)]
pub struct WarmRecord<V> {
    /// Cache key to store the record under
    pub key: String,
    /// The value to cache
    pub value: V,
    /// Tags to register the entry under
    pub tags: Vec<String>,
}

impl<V> WarmRecord<V> {
    /// Creates a record without tags.
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

// == Warm-Up Source ==
/// An external collaborator that can list its active records.
///
/// Implementations typically wrap a repository or domain service.
pub trait WarmUpSource<V> {
    /// Lists the currently active records to seed into the cache.
    fn list_active(&self) -> Result<Vec<WarmRecord<V>>>;
}
