//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! A cache miss is not an error: lookups return `Option::None` for absent or
//! expired keys. The variants here cover the two internal failure points,
//! both of which are caught and logged inside the crate rather than
//! propagated to `get`/`set` callers.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache internals.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A value could not be serialized while estimating its size
    #[error("Failed to serialize value for size estimation: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The warm-up collaborator failed to list active records
    #[error("Warm-up source unavailable: {0}")]
    WarmUpSource(#[from] anyhow::Error),
}

// == Result Type Alias ==
/// Convenience Result type for cache internals.
pub type Result<T> = std::result::Result<T, CacheError>;
