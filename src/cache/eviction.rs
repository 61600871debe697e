//! Eviction Policy Module
//!
//! Scoring and victim selection for the two eviction triggers. The store
//! owns the actual removal so tag-index consistency stays in one place;
//! this module only decides which keys go.
//!
//! The two triggers are independent and score differently:
//! - memory pressure (before an insert): keeps the entries that earn the
//!   most hits per minute of age and sheds the bottom quarter;
//! - count pressure (after an insert): sheds the entries that are oldest
//!   once each hit has been credited as extra recency.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Constants ==
/// Recency credit per hit for count-pressure eviction, in milliseconds.
///
/// One hit buys one second of recency: an entry read N times competes like
/// an entry created N seconds later. The unit makes the score comparable to
/// `created_at`, which is also in milliseconds.
pub const HIT_RECENCY_BONUS_MS: u64 = 1_000;

/// Fraction of entries shed by a memory-pressure eviction pass.
pub const MEMORY_EVICTION_FRACTION: f64 = 0.25;

// == Scores ==
/// Memory-pressure score: hits earned per minute of age.
///
/// Lowest score is least value per unit age and is evicted first. Ages
/// under a minute are clamped to one so fresh entries compete on raw hits.
pub fn value_score<V>(entry: &CacheEntry<V>, now_ms: u64) -> f64 {
    entry.hits as f64 / entry.age_minutes(now_ms).max(1.0)
}

/// Count-pressure score: creation time plus [`HIT_RECENCY_BONUS_MS`] per hit.
///
/// Lowest score is oldest-least-read and is evicted first.
pub fn recency_score<V>(entry: &CacheEntry<V>) -> u64 {
    entry
        .created_at
        .saturating_add(entry.hits.saturating_mul(HIT_RECENCY_BONUS_MS))
}

// == Victim Selection ==
/// Picks the bottom quarter of entries by [`value_score`], rounded down.
pub fn select_for_memory_pressure<V>(
    entries: &HashMap<String, CacheEntry<V>>,
    now_ms: u64,
) -> Vec<String> {
    let victim_count = (entries.len() as f64 * MEMORY_EVICTION_FRACTION) as usize;
    if victim_count == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(&String, f64)> = entries
        .iter()
        .map(|(key, entry)| (key, value_score(entry, now_ms)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    scored
        .into_iter()
        .take(victim_count)
        .map(|(key, _)| key.clone())
        .collect()
}

/// Picks the lowest-[`recency_score`] entries until the remainder fits
/// within `max_entries`.
pub fn select_for_capacity<V>(
    entries: &HashMap<String, CacheEntry<V>>,
    max_entries: usize,
) -> Vec<String> {
    let excess = entries.len().saturating_sub(max_entries);
    if excess == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(&String, u64)> = entries
        .iter()
        .map(|(key, entry)| (key, recency_score(entry)))
        .collect();
    scored.sort_by(|a, b| a.1.cmp(&b.1));

    scored
        .into_iter()
        .take(excess)
        .map(|(key, _)| key.clone())
        .collect()
}
