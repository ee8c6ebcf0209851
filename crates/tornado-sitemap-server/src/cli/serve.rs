//! `tornado-sitemap serve` — run the sitemap HTTP server.

use crate::cache::SitemapCache;
use crate::cli::output::{self, Styled};
use crate::state::AppState;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tornado_sitemap::{SitemapAggregator, SitemapConfig};
use tracing::info;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Listen address: the flag, else `TORNADO_BIND`, else [`DEFAULT_BIND`].
pub fn resolve_bind(bind: Option<SocketAddr>) -> Result<SocketAddr> {
    if let Some(addr) = bind {
        return Ok(addr);
    }
    let raw = std::env::var("TORNADO_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    raw.parse()
        .with_context(|| format!("invalid listen address {raw:?}"))
}

pub async fn run(
    config: SitemapConfig,
    bind: Option<SocketAddr>,
    cache_ttl_secs: u64,
) -> Result<()> {
    let address = resolve_bind(bind)?;

    info!(
        api = %config.api_url,
        frontend = %config.frontend_url,
        endpoints = config.endpoint_paths().len(),
        cache_ttl_secs,
        "starting tornado-sitemap v{}",
        env!("CARGO_PKG_VERSION")
    );

    let aggregator = SitemapAggregator::new(config).context("invalid sitemap configuration")?;
    let cache = SitemapCache::new(Duration::from_secs(cache_ttl_secs));
    let state = AppState::new(aggregator, cache);

    if !output::is_quiet() {
        let s = Styled::new();
        eprintln!(
            "  {} tornado-sitemap v{} listening on {address}",
            s.ok_sym(),
            env!("CARGO_PKG_VERSION")
        );
        eprintln!("  {}", s.dim(&format!("GET http://{address}/sitemap.xml")));
    }

    crate::start_server(state, address).await
}
