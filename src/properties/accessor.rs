//! Cache-Aside Accessor
//!
//! Read path for the property list: serve the cached aggregate when present,
//! otherwise load it from the record store and cache it.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheBackend, AGGREGATE_TTL_SECS, ALL_PROPERTIES_KEY};
use crate::error::Result;
use crate::properties::model::PropertyRecord;
use crate::properties::store::RecordStore;

/// Cache-aside reader of the full property list.
///
/// The aggregate lives under a single key shared by every caller. Concurrent
/// misses each read the store and overwrite the key (last writer wins)
/// unless coalescing is enabled.
pub struct PropertyCache {
    cache: Arc<dyn CacheBackend>,
    records: Arc<dyn RecordStore>,
    key: String,
    ttl_seconds: u64,
    fill_lock: Option<Mutex<()>>,
}

impl PropertyCache {
    pub fn new(cache: Arc<dyn CacheBackend>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            cache,
            records,
            key: ALL_PROPERTIES_KEY.to_string(),
            ttl_seconds: AGGREGATE_TTL_SECS,
            fill_lock: None,
        }
    }

    /// Overrides the aggregate TTL.
    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// When enabled, concurrent misses wait for one store read instead of
    /// each issuing their own.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.fill_lock = enabled.then(|| Mutex::new(()));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    // == Read ==
    /// Returns every property, from the cache when possible.
    ///
    /// Record store and cache backend failures propagate. An empty store
    /// yields, and caches, an empty list.
    pub async fn get_all_properties(&self) -> Result<Vec<PropertyRecord>> {
        if let Some(records) = self.cached().await? {
            return Ok(records);
        }

        match &self.fill_lock {
            Some(lock) => {
                let _guard = lock.lock().await;
                // Another caller may have filled the key while we waited
                if let Some(records) = self.cached().await? {
                    return Ok(records);
                }
                self.populate().await
            }
            None => self.populate().await,
        }
    }

    async fn cached(&self) -> Result<Option<Vec<PropertyRecord>>> {
        let Some(payload) = self.cache.get(&self.key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<PropertyRecord>>(&payload) {
            Ok(records) => {
                debug!(key = %self.key, count = records.len(), "Cache hit");
                Ok(Some(records))
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding undecodable cached aggregate");
                Ok(None)
            }
        }
    }

    async fn populate(&self) -> Result<Vec<PropertyRecord>> {
        let records = self.records.list_all().await?;
        let payload = serde_json::to_string(&records)?;
        self.cache.set(&self.key, payload, self.ttl_seconds).await?;

        info!(
            key = %self.key,
            count = records.len(),
            ttl = self.ttl_seconds,
            "Cache miss, loaded properties from record store"
        );
        Ok(records)
    }
}
