//! Cache Entry Module
//!
//! A single stored value with its expiration deadline.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A stored string value and the instant (Unix milliseconds) it stops being valid.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), None = persistent
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_seconds` from now, or never when `None`.
    pub fn new(value: String, ttl_seconds: Option<u64>) -> Self {
        let expires_at = ttl_seconds
            .map(|ttl| current_timestamp_ms().saturating_add(ttl.saturating_mul(1000)));
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiry check against a caller-supplied clock reading.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        matches!(self.expires_at, Some(deadline) if now_ms >= deadline)
    }

    // == Remaining TTL ==
    /// Remaining lifetime in whole seconds, rounded up like Redis `TTL`.
    ///
    /// Returns `None` for persistent entries and `Some(0)` once expired.
    pub fn ttl_remaining(&self) -> Option<u64> {
        let now = current_timestamp_ms();
        self.expires_at
            .map(|deadline| deadline.saturating_sub(now).div_ceil(1000))
    }

    /// Bytes accounted to this entry for `used_memory`.
    pub fn footprint(&self, key: &str) -> usize {
        key.len() + self.value.len()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
