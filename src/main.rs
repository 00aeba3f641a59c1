//! Property Cache - property listing service with a cache-aside aggregate

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use property_cache::cache::MemoryBackend;
use property_cache::properties::MemoryRecordStore;
use property_cache::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the property service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache backend and the record store, loading the seed if any
/// 4. Wire the accessor, invalidation hook and metrics reporter
/// 5. Start background TTL cleanup task
/// 6. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "property_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting property service");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        aggregate_ttl = config.aggregate_ttl,
        response_ttl = config.response_ttl,
        cleanup_interval = config.cleanup_interval,
        coalesce_misses = config.coalesce_misses,
        "Configuration loaded"
    );

    let backend = MemoryBackend::new();
    let records = Arc::new(MemoryRecordStore::new());
    let state = AppState::new(Arc::new(backend.clone()), records.clone(), &config).await;

    // Seed after wiring so the initial writes go through the invalidation hook too
    if let Some(path) = &config.seed_path {
        records
            .load_seed(path)
            .await
            .with_context(|| format!("loading seed file {}", path.display()))?;
    }

    let cleanup_handle = spawn_cleanup_task(backend, config.cleanup_interval);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
