//! Cache Backend Module
//!
//! The key/value contract the service depends on, and the bundled
//! in-process implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::CacheStore;
use crate::error::Result;

// == Cache Backend ==
/// External key/value store with TTL support and server-wide counters.
///
/// Implementations are shared across concurrent requests and must provide
/// their own atomicity per command.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl_seconds`, replacing any previous value.
    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;

    /// Removes `key`. Removing an absent key is `Ok(false)`, never an error.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Administrative report: server metric name to value.
    ///
    /// Includes at least `keyspace_hits`, `keyspace_misses`,
    /// `used_memory_human` and `instantaneous_ops_per_sec`.
    async fn info(&self) -> Result<BTreeMap<String, String>>;
}

// == Memory Backend ==
/// `CacheStore` shared behind an async lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the underlying store, used by the cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    /// Remaining TTL in seconds of a live key.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        self.store.read().await.ttl(key)
    }

    /// Whether a live key exists, without touching the keyspace counters.
    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains(key)
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: reads update counters and may evict an expired key
        Ok(self.store.write().await.get(key))
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        self.store
            .write()
            .await
            .set(key.to_string(), value, Some(ttl_seconds));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.store.write().await.delete(key))
    }

    async fn info(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.store.write().await.info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();

        backend.set("k", "v".to_string(), 60).await.unwrap();

        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(backend.contains("k").await);
        assert!(backend.ttl("k").await.unwrap() <= 60);
    }

    #[tokio::test]
    async fn test_memory_backend_delete_absent_is_ok() {
        let backend = MemoryBackend::new();

        assert!(!backend.delete("never-set").await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let backend = MemoryBackend::new();
        let other = backend.clone();

        backend.set("shared", "1".to_string(), 60).await.unwrap();

        assert!(other.contains("shared").await);
        let info = other.info().await.unwrap();
        assert_eq!(info["db0"], "keys=1,expires=1");
    }
}
