//! Cache Store Module
//!
//! In-process key/value engine with per-key TTL and server-wide keyspace counters.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::stats::{human_bytes, OpsWindow};
use crate::cache::{CacheEntry, KeyspaceStats};

// == Cache Store ==
/// Single-node key/value store behaving like a small Redis database.
///
/// Not synchronized; `MemoryBackend` wraps it in a lock.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Server-wide counters
    stats: KeyspaceStats,
    /// Recent command timestamps
    ops: OpsWindow,
    /// Bytes held by keys and values
    used_memory: usize,
    started_at: Instant,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: KeyspaceStats::new(),
            ops: OpsWindow::new(),
            used_memory: 0,
            started_at: Instant::now(),
        }
    }

    // == Get ==
    /// Returns the value of a live key.
    ///
    /// A hit or miss is counted on every call. Expired keys are removed on
    /// access and count as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let now = self.command();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expired(1);
        }
        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Stores a value, replacing any previous value and TTL for the key.
    pub fn set(&mut self, key: String, value: String, ttl_seconds: Option<u64>) {
        self.command();

        let entry = CacheEntry::new(value, ttl_seconds);
        self.used_memory += entry.footprint(&key);
        if let Some(previous) = self.entries.insert(key.clone(), entry) {
            self.used_memory -= previous.footprint(&key);
        }
    }

    // == Delete ==
    /// Removes a key. Returns whether a live key was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let now = self.command();

        match self.remove_entry(key) {
            Some(entry) if entry.is_expired_at(now) => {
                self.stats.record_expired(1);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    // == TTL ==
    /// Remaining lifetime of a live key in seconds, without touching counters.
    ///
    /// `None` when the key is absent, expired, or persistent.
    pub fn ttl(&self, key: &str) -> Option<u64> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(CacheEntry::ttl_remaining)
    }

    /// Whether a live key exists, without touching counters.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expired(expired_keys.len() as u64);
        expired_keys.len()
    }

    // == Info ==
    /// Server report keyed by Redis `INFO` field names.
    pub fn info(&mut self) -> BTreeMap<String, String> {
        let now = self.command();
        let expires = self
            .entries
            .values()
            .filter(|entry| entry.expires_at.is_some())
            .count();

        let mut info = BTreeMap::new();
        info.insert("keyspace_hits".to_string(), self.stats.keyspace_hits.to_string());
        info.insert(
            "keyspace_misses".to_string(),
            self.stats.keyspace_misses.to_string(),
        );
        info.insert("expired_keys".to_string(), self.stats.expired_keys.to_string());
        info.insert(
            "total_commands_processed".to_string(),
            self.stats.total_commands_processed.to_string(),
        );
        info.insert("used_memory".to_string(), self.used_memory.to_string());
        info.insert(
            "used_memory_human".to_string(),
            human_bytes(self.used_memory),
        );
        info.insert(
            "instantaneous_ops_per_sec".to_string(),
            self.ops.per_second(now).to_string(),
        );
        info.insert(
            "uptime_in_seconds".to_string(),
            self.started_at.elapsed().as_secs().to_string(),
        );
        info.insert(
            "db0".to_string(),
            format!("keys={},expires={}", self.entries.len(), expires),
        );
        info
    }

    /// Snapshot of the cumulative counters.
    pub fn stats(&self) -> KeyspaceStats {
        self.stats.clone()
    }

    /// Number of stored keys, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn command(&mut self) -> u64 {
        let now = current_timestamp_ms();
        self.stats.record_command();
        self.ops.record(now);
        now
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.used_memory -= entry.footprint(key);
        Some(entry)
    }
}
