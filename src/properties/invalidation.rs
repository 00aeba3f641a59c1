//! Invalidation Hook
//!
//! Drops the cached property aggregate whenever any property is written.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::cache::{CacheBackend, ALL_PROPERTIES_KEY};
use crate::error::Result;
use crate::properties::store::{WriteEvent, WriteObserver};

/// Deletes the aggregate key on every committed create, update or delete.
///
/// A failed delete leaves the old aggregate in place until its TTL runs out,
/// so failures are logged and counted rather than dropped.
pub struct InvalidationHook {
    cache: Arc<dyn CacheBackend>,
    key: String,
    failures: AtomicU64,
}

impl InvalidationHook {
    pub fn new(cache: Arc<dyn CacheBackend>) -> Self {
        Self::with_key(cache, ALL_PROPERTIES_KEY)
    }

    pub fn with_key(cache: Arc<dyn CacheBackend>, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
            failures: AtomicU64::new(0),
        }
    }

    /// Unconditionally deletes the aggregate key.
    ///
    /// Returns whether a cached aggregate was present. An absent key is not
    /// an error.
    pub async fn invalidate(&self) -> Result<bool> {
        self.cache.delete(&self.key).await
    }

    /// Number of invalidations the backend rejected since startup.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WriteObserver for InvalidationHook {
    async fn on_write(&self, event: &WriteEvent) {
        match self.invalidate().await {
            Ok(removed) => info!(
                key = %self.key,
                id = event.id,
                write = event.kind.as_str(),
                removed,
                "Cleared cache key after property write"
            ),
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    key = %self.key,
                    id = event.id,
                    write = event.kind.as_str(),
                    error = %e,
                    "Failed to clear cache key, stale data may be served until TTL expiry"
                );
            }
        }
    }
}
