//! Transport-layer response cache
//!
//! Whole response bodies stored in the cache backend under a per-route key.
//! Independent from the property aggregate: its own key, its own TTL, and
//! writes do not clear it.

use std::sync::Arc;

use tracing::debug;

use crate::cache::CacheBackend;
use crate::error::Result;

/// Key of the cached `GET /properties/` body
pub const LIST_RESPONSE_KEY: &str = "response:GET:/properties/";

#[derive(Clone)]
pub struct ResponseCache {
    cache: Arc<dyn CacheBackend>,
    ttl_seconds: u64,
}

impl ResponseCache {
    /// A `ttl_seconds` of 0 disables the cache.
    pub fn new(cache: Arc<dyn CacheBackend>, ttl_seconds: u64) -> Self {
        Self { cache, ttl_seconds }
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl_seconds > 0
    }

    /// Value for the `Cache-Control` header, if caching is enabled.
    pub fn cache_control(&self) -> Option<String> {
        self.is_enabled()
            .then(|| format!("max-age={}", self.ttl_seconds))
    }

    pub async fn lookup(&self, key: &str) -> Result<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let body = self.cache.get(key).await?;
        if body.is_some() {
            debug!(key, "Serving cached response");
        }
        Ok(body)
    }

    pub async fn store(&self, key: &str, body: &str) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.cache.set(key, body.to_string(), self.ttl_seconds).await
    }
}
