//! Metrics Reporter
//!
//! Reads the cache backend's server-wide counters and derives a hit ratio.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::cache::CacheBackend;
use crate::properties::InvalidationHook;

/// Backend `INFO` fields copied into the diagnostics map when present.
const DIAGNOSTIC_FIELDS: [&str; 2] = ["used_memory_human", "instantaneous_ops_per_sec"];

// == Cache Metrics ==
/// Point-in-time read of the backend's cumulative counters.
///
/// Counters cover the whole backend since it started; sample twice and
/// diff to get a rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, `None` until any lookup happened
    pub hit_ratio: Option<f64>,
    pub diagnostics: BTreeMap<String, String>,
    /// Set when the backend could not be queried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CacheMetrics {
    /// Builds a report from raw counters.
    pub fn from_counters(hits: u64, misses: u64) -> Self {
        Self {
            hits,
            misses,
            hit_ratio: hit_ratio(hits, misses),
            diagnostics: BTreeMap::new(),
            error: None,
        }
    }

    /// Zeroed report carrying the reason the backend could not be read.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::from_counters(0, 0)
        }
    }
}

/// `hits / (hits + misses)`, or `None` when there were no lookups.
pub fn hit_ratio(hits: u64, misses: u64) -> Option<f64> {
    // Summed in f64: counters from a remote INFO report may be near u64::MAX
    (hits > 0 || misses > 0).then(|| hits as f64 / (hits as f64 + misses as f64))
}

// == Metrics Reporter ==
pub struct MetricsReporter {
    cache: Arc<dyn CacheBackend>,
    hook: Option<Arc<InvalidationHook>>,
}

impl MetricsReporter {
    pub fn new(cache: Arc<dyn CacheBackend>) -> Self {
        Self { cache, hook: None }
    }

    /// Reports the hook's failed invalidations alongside backend diagnostics.
    pub fn with_invalidation_hook(mut self, hook: Arc<InvalidationHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Queries the backend. Never fails: an unreachable backend yields a
    /// zeroed report with `error` set.
    pub async fn get_cache_metrics(&self) -> CacheMetrics {
        let mut metrics = match self.cache.info().await {
            Ok(info) => {
                let mut metrics = CacheMetrics::from_counters(
                    counter(&info, "keyspace_hits"),
                    counter(&info, "keyspace_misses"),
                );
                for field in DIAGNOSTIC_FIELDS {
                    if let Some(value) = info.get(field) {
                        metrics.diagnostics.insert(field.to_string(), value.clone());
                    }
                }
                metrics
            }
            Err(e) => {
                warn!(error = %e, "Cache backend unavailable for metrics");
                CacheMetrics::unavailable(e.to_string())
            }
        };

        if let Some(hook) = &self.hook {
            metrics
                .diagnostics
                .insert("invalidation_failures".to_string(), hook.failures().to_string());
        }
        metrics
    }
}

fn counter(info: &BTreeMap<String, String>, field: &str) -> u64 {
    info.get(field)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}
