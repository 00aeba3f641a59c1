//! Metrics Module
//!
//! Cache-layer observability derived from the backend's own counters.

mod reporter;

pub use reporter::{hit_ratio, CacheMetrics, MetricsReporter};
