//! Cache Module
//!
//! Cache backend contract plus an in-process, Redis-like implementation
//! with TTL expiration and keyspace counters.

mod backend;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use backend::{CacheBackend, MemoryBackend};
pub use entry::CacheEntry;
pub use stats::{human_bytes, KeyspaceStats};
pub use store::CacheStore;

// == Public Constants ==
/// Key of the cached property aggregate
pub const ALL_PROPERTIES_KEY: &str = "all_properties";

/// Lifetime of the cached property aggregate in seconds (1 hour)
pub const AGGREGATE_TTL_SECS: u64 = 3600;

/// Lifetime of cached list responses in seconds (15 minutes)
pub const RESPONSE_TTL_SECS: u64 = 900;
