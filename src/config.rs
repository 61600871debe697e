//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Default TTL in milliseconds for entries without an explicit TTL
    pub default_ttl_ms: u64,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Estimated-memory threshold in bytes that triggers eviction before inserts
    pub memory_threshold_bytes: usize,
    /// Background TTL sweep interval in milliseconds
    pub sweep_interval_ms: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000, i.e. 5 minutes)
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `MEMORY_THRESHOLD_BYTES` - Eviction threshold in bytes (default: 67108864, i.e. 64 MiB)
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 30000)
    pub fn from_env() -> Self {
        Self {
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            memory_threshold_bytes: env::var("MEMORY_THRESHOLD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64 * 1024 * 1024),
            sweep_interval_ms: env::var("SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: 300_000,
            max_entries: 1000,
            memory_threshold_bytes: 64 * 1024 * 1024,
            sweep_interval_ms: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.memory_threshold_bytes, 64 * 1024 * 1024);
        assert_eq!(config.sweep_interval_ms, 30_000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("DEFAULT_TTL_MS");
        env::remove_var("MAX_ENTRIES");
        env::remove_var("MEMORY_THRESHOLD_BYTES");
        env::remove_var("SWEEP_INTERVAL_MS");

        let config = CacheConfig::from_env();
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.memory_threshold_bytes, 64 * 1024 * 1024);
        assert_eq!(config.sweep_interval_ms, 30_000);
    }
}
