//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use keygate_core::config::cache::MemoryCacheConfig;
use keygate_core::result::AppResult;
use keygate_core::traits::CacheProvider;

/// A cached value together with the TTL it was written with.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
    /// `None` when the TTL is too large to represent.
    deadline: Option<Instant>,
}

impl Entry {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            ttl,
            deadline: Instant::now().checked_add(ttl),
        }
    }

    /// moka may still hand out an entry whose TTL has passed but which has
    /// not been evicted yet.
    fn is_live(&self) -> bool {
        self.deadline.is_none_or(|deadline| Instant::now() < deadline)
    }
}

/// Per-entry expiry policy: every write restarts the clock with its own TTL.
#[derive(Debug, Clone, Copy)]
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, Entry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(EntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self
            .cache
            .get(key)
            .await
            .filter(Entry::is_live)
            .map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.cache.insert(key.to_string(), Entry::new(value, ttl)).await;
        debug!(key, ttl_secs = ttl.as_secs(), "Cached entry");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        Ok(self
            .cache
            .remove(key)
            .await
            .is_some_and(|entry| entry.is_live()))
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 })
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider
            .set("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let provider = make_provider();
        provider
            .set("key2", "value2", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(provider.delete("key2").await.unwrap());
        assert_eq!(provider.get("key2").await.unwrap(), None);
        // idempotent
        assert!(!provider.delete("key2").await.unwrap());
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_own_ttl() {
        let provider = make_provider();
        provider
            .set("short", "v", Duration::from_millis(300))
            .await
            .unwrap();
        provider
            .set("long", "v", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(provider.get("short").await.unwrap(), None);
        assert_eq!(provider.get("long").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_delete_of_expired_entry_reports_absent() {
        let provider = make_provider();
        provider
            .set("stale", "v", Duration::from_millis(100))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;

        // no read in between, so moka has not evicted it yet
        assert!(!provider.delete("stale").await.unwrap());
        assert!(!provider.exists("stale").await.unwrap());
    }

    #[test]
    fn test_entry_liveness() {
        assert!(Entry::new("v", Duration::from_secs(60)).is_live());
        assert!(!Entry::new("v", Duration::ZERO).is_live());
        assert!(Entry::new("v", Duration::MAX).is_live());
    }

    #[tokio::test]
    async fn test_upsert_replaces_ttl() {
        let provider = make_provider();
        provider
            .set("key3", "old", Duration::from_millis(300))
            .await
            .unwrap();
        provider
            .set("key3", "new", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(provider.get("key3").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let provider = make_provider();
        assert!(provider.health_check().await.unwrap());
    }
}
