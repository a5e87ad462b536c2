//! # Registry API
//!
//! Starts the HTTP server.
//!
//! ```text
//! env ──► ApiConfig ──► AppState::initialize (pool, migrations, seed)
//!                              │
//!                              ▼
//!                  axum::serve(listener, router)
//!                              │
//!               Ctrl+C / SIGTERM ──► graceful shutdown ──► close pool
//! ```

use std::sync::Arc;

use anyhow::Context;
use registry_api::{build_router, ApiConfig, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting client registry API server...");

    let config = ApiConfig::load()?;
    let addr = config.socket_addr()?;
    info!(
        %addr,
        database = %config.database_path,
        seed_regions = config.seed_regions,
        "Configuration loaded"
    );

    let state = Arc::new(
        AppState::initialize(config)
            .await
            .context("failed to initialize database")?,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, build_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initializes tracing.
///
/// `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,registry=debug,sqlx=warn,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
