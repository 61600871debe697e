//! Size Estimation Module
//!
//! Heuristic per-entry memory accounting. The estimate is deliberately
//! approximate: it exists to drive the memory-pressure eviction trigger,
//! not to account for every allocation.

use serde::Serialize;

use crate::error::Result;

// == Constants ==
/// Fixed bookkeeping cost added to every entry's estimate, in bytes.
pub const ENTRY_OVERHEAD_BYTES: usize = 64;

/// Charge assigned to an entry whose value could not be serialized.
pub const FALLBACK_ENTRY_BYTES: usize = 1024;

// == Size Estimator ==
/// Estimates the memory footprint of a cache entry.
///
/// The store calls this once per insert and caches the result on the entry,
/// so estimators may serialize freely without showing up on the read path.
/// Callers with cheaper or more accurate sizing for their value type can
/// plug in their own implementation.
pub trait SizeEstimator<V>: Send + Sync {
    /// Returns the estimated footprint of `(key, value)` in bytes.
    fn estimate(&self, key: &str, value: &V) -> Result<usize>;
}

// == JSON Size Estimator ==
/// Default estimator: measures the value through its JSON serialization.
///
/// Key and serialized value are charged at two bytes per character to cover
/// string bookkeeping, plus [`ENTRY_OVERHEAD_BYTES`] for the entry itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSizeEstimator;

impl<V: Serialize> SizeEstimator<V> for JsonSizeEstimator {
    fn estimate(&self, key: &str, value: &V) -> Result<usize> {
        let serialized = serde_json::to_string(value)?;
        Ok(2 * key.len() + 2 * serialized.len() + ENTRY_OVERHEAD_BYTES)
    }
}
