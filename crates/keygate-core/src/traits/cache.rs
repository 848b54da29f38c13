//! Cache provider trait for pluggable caching backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for TTL-capable key-value backends (Redis or in-memory).
///
/// Values are plain strings. Every entry is written with an explicit TTL
/// and the backend drops it on its own once the TTL elapses; callers never
/// sweep expired keys.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Upsert a value with a TTL (`SET key value EX ttl`).
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Returns `true` if the key was present.
    ///
    /// Deleting an absent key is not an error. The presence check and the
    /// removal happen as one operation, so of several concurrent deletes of
    /// the same key exactly one observes `true`.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Check whether a key exists in the cache.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
