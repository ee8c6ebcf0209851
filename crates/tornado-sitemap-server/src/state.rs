use std::sync::Arc;

use tornado_sitemap::SitemapAggregator;

use crate::cache::SitemapCache;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<SitemapAggregator>,
    pub cache: Arc<SitemapCache>,
}

impl AppState {
    pub fn new(aggregator: SitemapAggregator, cache: SitemapCache) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            cache: Arc::new(cache),
        }
    }

    pub fn frontend_url(&self) -> &str {
        &self.aggregator.config().frontend_url
    }
}
