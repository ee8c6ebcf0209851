//! HTTP surface and CLI for the Tornado Watch sitemap.
//!
//! Serves `GET /sitemap.xml`, `GET /sitemap.json`, `GET /robots.txt` and
//! `GET /health` from a [`tornado_sitemap::SitemapAggregator`], caching the
//! generated sitemap for an hour.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;

pub mod cache;
pub mod cli;
pub mod error;
pub mod robots;
pub mod routes;
pub mod state;
pub mod telemetry;

use state::AppState;

/// Bind `address` and serve until Ctrl+C or SIGTERM.
pub async fn start_server(state: AppState, address: SocketAddr) -> Result<()> {
    let app = routes::router(state);

    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
