//! Property Cache - property listing service with a cache-aside aggregate
//!
//! Reads of the full property list go through a single cached aggregate;
//! every property write invalidates it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod properties;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, Result};
pub use tasks::spawn_cleanup_task;
