//! Configuration Module
//!
//! Handles loading service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::{AGGREGATE_TTL_SECS, RESPONSE_TTL_SECS};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds of the cached property aggregate
    pub aggregate_ttl: u64,
    /// TTL in seconds of cached list responses, 0 disables response caching
    pub response_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Let concurrent cache misses share one record store read
    pub coalesce_misses: bool,
    /// Optional JSON file of properties loaded at startup
    pub seed_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `CACHE_TTL` - Aggregate cache TTL in seconds, 0 falls back to the default (default: 3600)
    /// - `RESPONSE_CACHE_TTL` - List response cache TTL in seconds (default: 900)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `COALESCE_MISSES` - `true`/`1` to coalesce concurrent misses (default: false)
    /// - `PROPERTIES_SEED` - Path of a JSON seed file (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            aggregate_ttl: positive(parse_var("CACHE_TTL")).unwrap_or(defaults.aggregate_ttl),
            response_ttl: parse_var("RESPONSE_CACHE_TTL").unwrap_or(defaults.response_ttl),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            coalesce_misses: env::var("COALESCE_MISSES")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.coalesce_misses),
            seed_path: env::var("PROPERTIES_SEED")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            aggregate_ttl: AGGREGATE_TTL_SECS,
            response_ttl: RESPONSE_TTL_SECS,
            cleanup_interval: 1,
            coalesce_misses: false,
            seed_path: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// A zero TTL would expire the aggregate on write, so it counts as unset.
fn positive(value: Option<u64>) -> Option<u64> {
    value.filter(|&v| v > 0)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
