//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired keys out of the
//! in-process cache backend.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryBackend;

/// Spawns a task that removes expired keys every `cleanup_interval_secs`.
///
/// Expired keys are already invisible to readers; the sweep only reclaims
/// their memory. Abort the returned handle on shutdown.
pub fn spawn_cleanup_task(backend: MemoryBackend, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));
    let store = backend.store();

    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "Starting TTL cleanup task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.write().await.cleanup_expired();

            if removed > 0 {
                info!(removed, "TTL cleanup removed expired keys");
            } else {
                debug!("TTL cleanup: no expired keys found");
            }
        }
    })
}
