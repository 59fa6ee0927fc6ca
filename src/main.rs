//! Memory Cache - standalone server
//!
//! Serves a single memory cache instance over HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memory_cache::api::create_router;
use memory_cache::{
    spawn_maintenance_task, AppState, Library, Lifecycle, MemoryConfig, MemoryLoader,
    ServerConfig,
};

/// Main entry point for the memory cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load cache and server configuration from environment variables
/// 3. Initialize the cache through its loader
/// 4. Start background maintenance task
/// 5. Serve the HTTP API until SIGINT/SIGTERM
/// 6. Run the disconnect/uninstall hooks
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memory_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Memory Cache Server");

    let memory_config = MemoryConfig::from_env();
    let server_config = ServerConfig::from_env();
    info!(
        "Configuration loaded: limit={}, expires_in={}s, max_value_size={}, port={}, maintenance_interval={}s",
        memory_config.effective_limit(),
        memory_config.expires_in.as_secs(),
        memory_config.max_value_size,
        server_config.port,
        server_config.maintenance_interval
    );

    let mut loader = MemoryLoader::new("memory");
    let cache = loader
        .init(&memory_config)
        .context("failed to initialize memory cache")?;

    let maintenance_handle =
        spawn_maintenance_task(cache.clone(), server_config.maintenance_interval);
    info!("Background maintenance task started");

    let app = create_router(AppState::new(cache.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(maintenance_handle))
        .await
        .context("server error")?;

    cache.disconnect()?;
    cache.uninstall()?;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the maintenance task and allows graceful shutdown.
async fn shutdown_signal(maintenance_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    maintenance_handle.abort();
    warn!("Maintenance task aborted");
}
