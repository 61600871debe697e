//! Integration tests driving the public cache handle end to end.

use std::time::Duration;

use serde_json::json;

use tagcache::{
    generate_key, CacheConfig, Priority, SetOptions, TagCache, WarmRecord, WarmUpSource,
};

fn test_config() -> CacheConfig {
    CacheConfig {
        default_ttl_ms: 300_000,
        max_entries: 100,
        memory_threshold_bytes: 64 * 1024 * 1024,
        sweep_interval_ms: 60_000,
    }
}

/// Makes cache logs visible when running with RUST_LOG set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// == Warm-Up Sources ==
struct StaticSource(Vec<WarmRecord<String>>);

impl WarmUpSource<String> for StaticSource {
    fn list_active(&self) -> anyhow::Result<Vec<WarmRecord<String>>> {
        Ok(self.0.clone())
    }
}

struct UnavailableSource;

impl WarmUpSource<String> for UnavailableSource {
    fn list_active(&self) -> anyhow::Result<Vec<WarmRecord<String>>> {
        Err(anyhow::anyhow!("tenant repository offline"))
    }
}

// == Basic Operations ==
#[tokio::test]
async fn test_get_never_set_key_misses() {
    let cache: TagCache<String> = TagCache::new(test_config());

    assert_eq!(cache.get("never_set").await, None);

    let stats = cache.stats().await;
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);
    cache.destroy().await;
}

#[tokio::test]
async fn test_set_then_get_roundtrip() {
    let cache: TagCache<String> = TagCache::new(test_config());

    cache
        .set(
            "llm:42",
            "a completion".to_string(),
            SetOptions::default().with_ttl_ms(60_000),
        )
        .await;

    assert_eq!(cache.get("llm:42").await, Some("a completion".to_string()));
    assert_eq!(cache.len().await, 1);
    cache.destroy().await;
}

#[tokio::test]
async fn test_json_value_payloads() {
    let cache: TagCache<serde_json::Value> = TagCache::new(test_config());
    let completion = json!({"model": "sonnet", "text": "hello", "tokens": 5});

    cache
        .set("llm:42", completion.clone(), SetOptions::default())
        .await;

    assert_eq!(cache.get("llm:42").await, Some(completion));
    assert!(cache.stats().await.memory_usage_bytes > 0);
    cache.destroy().await;
}

#[tokio::test]
async fn test_set_accepts_priority() {
    let cache: TagCache<String> = TagCache::new(test_config());

    cache
        .set(
            "lead:9",
            "lead".to_string(),
            SetOptions::default().with_priority(Priority::High),
        )
        .await;

    assert_eq!(cache.get("lead:9").await, Some("lead".to_string()));
    cache.destroy().await;
}

#[tokio::test]
async fn test_delete_reports_presence() {
    let cache: TagCache<String> = TagCache::new(test_config());

    cache
        .set("key1", "value".to_string(), SetOptions::default())
        .await;

    assert!(cache.delete("key1").await);
    assert!(!cache.delete("key1").await);
    assert_eq!(cache.get("key1").await, None);
    cache.destroy().await;
}

// == TTL Expiry ==
#[tokio::test]
async fn test_ttl_expiry_clears_entry_and_tag_buckets() {
    let cache: TagCache<String> = TagCache::new(test_config());

    cache
        .set(
            "short_lived",
            "value".to_string(),
            SetOptions::default()
                .with_ttl_ms(300)
                .with_tags(["tenant:5", "llm"]),
        )
        .await;

    assert!(cache.get("short_lived").await.is_some());

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(cache.get("short_lived").await, None);
    // The key must be gone from every bucket it was in
    assert_eq!(cache.invalidate_by_tag("tenant:5").await, 0);
    assert_eq!(cache.invalidate_by_tag("llm").await, 0);
    cache.destroy().await;
}

#[tokio::test]
async fn test_sweeper_removes_expired_entries_without_access() {
    init_tracing();
    let config = CacheConfig {
        sweep_interval_ms: 100,
        ..test_config()
    };
    let cache: TagCache<String> = TagCache::new(config);

    cache
        .set(
            "expire_soon",
            "value".to_string(),
            SetOptions::default().with_ttl_ms(100),
        )
        .await;

    tokio::time::sleep(Duration::from_millis(500)).await;

    // The sweeper removed the entry; no lookup was needed
    assert_eq!(cache.len().await, 0);
    cache.destroy().await;
}

// == Tag Invalidation ==
#[tokio::test]
async fn test_tenant_invalidation_scenario() {
    let cache: TagCache<String> = TagCache::new(test_config());

    for i in 0..3 {
        cache
            .set(
                format!("car:{}", i),
                "listing".to_string(),
                SetOptions::default().with_tags(["tenant:5"]),
            )
            .await;
    }
    cache
        .set(
            "car:other",
            "listing".to_string(),
            SetOptions::default().with_tags(["tenant:6"]),
        )
        .await;

    assert_eq!(cache.invalidate_by_tag("tenant:5").await, 3);

    for i in 0..3 {
        assert_eq!(cache.get(&format!("car:{}", i)).await, None);
    }
    assert!(cache.get("car:other").await.is_some());
    cache.destroy().await;
}

#[tokio::test]
async fn test_invalidate_by_tags_counts_shared_keys_once() {
    let cache: TagCache<String> = TagCache::new(test_config());

    cache
        .set(
            "shared",
            "value".to_string(),
            SetOptions::default().with_tags(["a", "b"]),
        )
        .await;
    cache
        .set(
            "only_b",
            "value".to_string(),
            SetOptions::default().with_tags(["b"]),
        )
        .await;

    assert_eq!(cache.invalidate_by_tags(&["a", "b"]).await, 2);
    assert!(cache.is_empty().await);
    cache.destroy().await;
}

// == Eviction ==
#[tokio::test]
async fn test_capacity_eviction_drops_lowest_recency_entry() {
    let config = CacheConfig {
        max_entries: 4,
        ..test_config()
    };
    let cache: TagCache<String> = TagCache::new(config);

    // Four entries whose hit counts grow with their index
    for i in 1..=4 {
        cache
            .set(format!("key{}", i), "value".to_string(), SetOptions::default())
            .await;
        for _ in 0..i {
            cache.get(&format!("key{}", i)).await;
        }
    }

    // The fifth entry arrives with zero hits: its recency score trails
    // every hit-credited entry, so it is the one evicted
    cache
        .set("key5", "value".to_string(), SetOptions::default())
        .await;

    assert!(cache.len().await <= 4);
    assert_eq!(cache.get("key5").await, None);
    for i in 1..=4 {
        assert!(cache.get(&format!("key{}", i)).await.is_some());
    }
    assert!(cache.stats().await.evictions >= 1);
    cache.destroy().await;
}

// == Key Builder ==
#[tokio::test]
async fn test_generate_key_is_order_independent() {
    let first = json!({"a": 1, "b": 2});
    let second = json!({"b": 2, "a": 1});

    assert_eq!(
        generate_key("llm", "42", Some(&first)),
        generate_key("llm", "42", Some(&second))
    );
    assert_eq!(generate_key("llm", "42", None), "llm:42");
}

#[tokio::test]
async fn test_generated_keys_address_cache_entries() {
    let cache: TagCache<String> = TagCache::new(test_config());
    let context = json!({"temperature": 0.2, "model": "sonnet"});
    let key = generate_key("llm", "42", Some(&context));

    cache
        .set(key.clone(), "completion".to_string(), SetOptions::default())
        .await;

    let same_context = json!({"model": "sonnet", "temperature": 0.2});
    let same_key = generate_key("llm", "42", Some(&same_context));
    assert_eq!(cache.get(&same_key).await, Some("completion".to_string()));
    cache.destroy().await;
}

// == Stats ==
#[tokio::test]
async fn test_stats_hit_rate() {
    let cache: TagCache<String> = TagCache::new(test_config());

    cache
        .set("key1", "value".to_string(), SetOptions::default())
        .await;
    cache.get("key1").await;
    cache.get("key1").await;
    cache.get("key1").await;
    cache.get("missing").await;

    let stats = cache.stats().await;
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hit_rate(), 0.75);
    cache.destroy().await;
}

#[tokio::test]
async fn test_clear_resets_entries_and_counters() {
    let cache: TagCache<String> = TagCache::new(test_config());

    cache
        .set("key1", "value".to_string(), SetOptions::default())
        .await;
    cache.get("key1").await;
    cache.get("missing").await;

    cache.clear().await;

    let stats = cache.stats().await;
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.total_entries, 0);
    assert_eq!(cache.get("key1").await, None);
    cache.destroy().await;
}

// == Destroy ==
#[tokio::test]
async fn test_destroy_is_idempotent_and_leaves_misses() {
    let cache: TagCache<String> = TagCache::new(test_config());

    cache
        .set("key1", "value".to_string(), SetOptions::default())
        .await;

    cache.destroy().await;
    cache.destroy().await;

    assert_eq!(cache.get("key1").await, None);
    assert!(cache.is_empty().await);
}

// == Warm-Up ==
#[tokio::test]
async fn test_warm_up_seeds_records_with_tags() {
    let cache: TagCache<String> = TagCache::new(test_config());
    let source = StaticSource(vec![
        WarmRecord::new("tenant:7", "acme".to_string()).with_tags(["tenant:7", "tenant"]),
        WarmRecord::new("tenant:8", "globex".to_string()).with_tags(["tenant:8", "tenant"]),
    ]);

    let seeded = cache.warm_up(&source, 60_000).await;

    assert_eq!(seeded, 2);
    assert_eq!(cache.get("tenant:7").await, Some("acme".to_string()));
    assert_eq!(cache.get("tenant:8").await, Some("globex".to_string()));
    assert_eq!(cache.invalidate_by_tag("tenant").await, 2);
    cache.destroy().await;
}

#[tokio::test]
async fn test_warm_up_failure_is_nonfatal() {
    init_tracing();
    let cache: TagCache<String> = TagCache::new(test_config());

    assert_eq!(cache.warm_up(&UnavailableSource, 60_000).await, 0);

    // The cache still works after the failed warm-up
    cache
        .set("key1", "value".to_string(), SetOptions::default())
        .await;
    assert_eq!(cache.get("key1").await, Some("value".to_string()));
    cache.destroy().await;
}
