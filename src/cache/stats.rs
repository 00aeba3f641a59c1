//! Keyspace Statistics Module
//!
//! Server-wide counters in the shape Redis reports them through `INFO`.

use std::collections::VecDeque;

use serde::Serialize;

/// Window used for `instantaneous_ops_per_sec`.
const OPS_WINDOW_MS: u64 = 1000;

// == Keyspace Stats ==
/// Cumulative counters over the whole lifetime of a cache store.
///
/// Counters cover every key and every client; they are never scoped to a
/// single logical entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeyspaceStats {
    /// Lookups that found a live key
    pub keyspace_hits: u64,
    /// Lookups that found nothing or an expired key
    pub keyspace_misses: u64,
    /// Keys removed because their TTL elapsed
    pub expired_keys: u64,
    /// Every command served (get, set, delete, info)
    pub total_commands_processed: u64,
}

impl KeyspaceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.keyspace_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.keyspace_misses += 1;
    }

    pub fn record_expired(&mut self, count: u64) {
        self.expired_keys += count;
    }

    pub fn record_command(&mut self) {
        self.total_commands_processed += 1;
    }
}

// == Ops Window ==
/// Sliding one-second window of command timestamps.
#[derive(Debug, Default)]
pub struct OpsWindow {
    stamps: VecDeque<u64>,
}

impl OpsWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a command issued at `now_ms`.
    pub fn record(&mut self, now_ms: u64) {
        self.evict(now_ms);
        self.stamps.push_back(now_ms);
    }

    /// Commands seen in the second ending at `now_ms`.
    pub fn per_second(&mut self, now_ms: u64) -> usize {
        self.evict(now_ms);
        self.stamps.len()
    }

    fn evict(&mut self, now_ms: u64) {
        while let Some(&oldest) = self.stamps.front() {
            if now_ms.saturating_sub(oldest) >= OPS_WINDOW_MS {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Formats a byte count the way Redis prints `used_memory_human`.
pub fn human_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["K", "M", "G", "T"];

    if bytes < 1024 {
        return format!("{}B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2}{}", value, UNITS[unit])
}
