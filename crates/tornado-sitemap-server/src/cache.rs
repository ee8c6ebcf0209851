//! Time-bounded cache of the last generated sitemap.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tornado_sitemap::{Sitemap, SitemapAggregator};
use tracing::debug;

/// Upstream data is re-polled at most once an hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
/// A fallback sitemap is only kept long enough to avoid hammering a failing upstream.
pub const FALLBACK_TTL: Duration = Duration::from_secs(60);

struct CachedSitemap {
    sitemap: Arc<Sitemap>,
    stored_at: Instant,
}

/// Holds the most recent sitemap and regenerates it once it is stale.
///
/// Concurrent requests for a stale sitemap trigger a single generation;
/// the others wait for it and share the result.
pub struct SitemapCache {
    ttl: Duration,
    fallback_ttl: Duration,
    entry: RwLock<Option<CachedSitemap>>,
    refresh: Mutex<()>,
}

impl SitemapCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            fallback_ttl: FALLBACK_TTL.min(ttl),
            entry: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached sitemap if fresh, otherwise generate a new one.
    pub async fn get_or_generate(&self, aggregator: &SitemapAggregator) -> Arc<Sitemap> {
        if let Some(sitemap) = self.fresh().await {
            return sitemap;
        }

        let _refresh = self.refresh.lock().await;
        // Another request may have refreshed while we waited.
        if let Some(sitemap) = self.fresh().await {
            return sitemap;
        }

        debug!("sitemap cache stale, regenerating");
        let sitemap = Arc::new(aggregator.generate().await);
        *self.entry.write().await = Some(CachedSitemap {
            sitemap: Arc::clone(&sitemap),
            stored_at: Instant::now(),
        });
        sitemap
    }

    /// Drop the cached sitemap so the next request regenerates.
    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }

    async fn fresh(&self) -> Option<Arc<Sitemap>> {
        let entry = self.entry.read().await;
        let cached = entry.as_ref()?;
        let ttl = if cached.sitemap.is_fallback() {
            self.fallback_ttl
        } else {
            self.ttl
        };
        (cached.stored_at.elapsed() < ttl).then(|| Arc::clone(&cached.sitemap))
    }
}

impl Default for SitemapCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
