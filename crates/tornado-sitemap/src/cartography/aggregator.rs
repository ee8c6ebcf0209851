//! The sitemap aggregator: fetch every source, normalize, deduplicate, map
//! to URL records, and fall back to a static sitemap when anything goes
//! wrong.

use crate::acquisition::endpoint::Endpoint;
use crate::acquisition::fetcher::{fetch_all, Fetched};
use crate::acquisition::http_client::HttpClient;
use crate::cartography::entity::{dedupe_by_id, entity_timestamp};
use crate::cartography::normalize::flatten;
use crate::cartography::record::{page_location, ChangeFrequency, Priority, UrlRecord};
use crate::cartography::source::{EntityCategory, EntitySource};
use crate::config::{SitemapConfig, StaticRoute};
use crate::error::{Result, SitemapError};
use crate::render;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use url::Url;

/// Whether a sitemap came from a full generation or the static fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapOrigin {
    Generated,
    Fallback,
}

/// What one endpoint contributed to a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointReport {
    pub path: String,
    pub succeeded: bool,
    pub entities: usize,
    pub elapsed_ms: u64,
}

/// How many records one entity source contributed, after deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub category: EntityCategory,
    pub records: usize,
    /// Index of the group's first record in [`Sitemap::records`].
    #[serde(skip)]
    offset: usize,
}

/// The result of one generation request.
#[derive(Debug, Clone, Serialize)]
pub struct Sitemap {
    /// Static pages first, then one group per entity source in configured
    /// order. No two records share a location.
    pub records: Vec<UrlRecord>,
    pub origin: SitemapOrigin,
    pub generated_at: DateTime<Utc>,
    pub endpoints: Vec<EndpointReport>,
    /// One entry per entity source, in configured order. Empty for a fallback.
    pub categories: Vec<CategoryReport>,
}

impl Sitemap {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == SitemapOrigin::Fallback
    }

    /// Render as a Sitemaps-protocol `<urlset>` document.
    pub fn to_xml(&self) -> Result<String> {
        render::xml::write_urlset(&self.records)
    }

    /// Render the record list as JSON.
    pub fn to_json(&self) -> Result<String> {
        render::records_to_json(&self.records)
    }

    /// Records contributed by `category`, in order.
    pub fn records_in(&self, category: EntityCategory) -> Vec<&UrlRecord> {
        self.categories
            .iter()
            .filter(|report| report.category == category)
            .flat_map(|report| &self.records[report.offset..report.offset + report.records])
            .collect()
    }

    /// Number of records contributed by `category`.
    pub fn category_count(&self, category: EntityCategory) -> usize {
        self.categories
            .iter()
            .filter(|report| report.category == category)
            .map(|report| report.records)
            .sum()
    }
}

/// Generates sitemaps from an injected [`SitemapConfig`].
pub struct SitemapAggregator {
    config: SitemapConfig,
    client: HttpClient,
}

impl SitemapAggregator {
    /// Validate `config` and build a client with its request timeout.
    pub fn new(config: SitemapConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::new(config.request_timeout())?;
        Ok(Self { config, client })
    }

    /// Use an existing client. `config` is taken as-is, without validation.
    pub fn with_client(config: SitemapConfig, client: HttpClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &SitemapConfig {
        &self.config
    }

    /// Generate the sitemap. Never fails: on any error (or panic) during
    /// generation the static fallback is returned instead.
    pub async fn generate(&self) -> Sitemap {
        self.or_fallback(self.try_generate()).await
    }

    async fn or_fallback<F>(&self, generation: F) -> Sitemap
    where
        F: Future<Output = Result<Sitemap>>,
    {
        let start = Instant::now();
        match AssertUnwindSafe(generation).catch_unwind().await {
            Ok(Ok(sitemap)) => {
                info!(
                    records = sitemap.len(),
                    failed_endpoints = sitemap.endpoints.iter().filter(|e| !e.succeeded).count(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "sitemap generated"
                );
                sitemap
            }
            Ok(Err(e)) => {
                error!(error = %e, "sitemap generation failed, serving fallback");
                self.fallback()
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(%reason, "sitemap generation panicked, serving fallback");
                self.fallback()
            }
        }
    }

    /// Fetch every endpoint concurrently and assemble the sitemap.
    pub async fn try_generate(&self) -> Result<Sitemap> {
        let endpoints: Vec<&Endpoint> = self
            .config
            .sources
            .iter()
            .flat_map(|s| s.endpoints.iter())
            .collect();
        debug!(count = endpoints.len(), "polling endpoints");

        let fetched = fetch_all(&self.client, &self.config.api_url, &endpoints).await;
        assemble(&self.config, &fetched, Utc::now())
    }

    /// The static fallback sitemap. Performs no I/O and cannot fail.
    pub fn fallback(&self) -> Sitemap {
        fallback_sitemap(&self.config, Utc::now())
    }
}

/// Build a sitemap from already-fetched payloads.
///
/// `fetched` must hold one entry per endpoint, in source-then-endpoint
/// order, as produced by polling `config.sources`.
pub fn assemble(
    config: &SitemapConfig,
    fetched: &[Fetched],
    now: DateTime<Utc>,
) -> Result<Sitemap> {
    let expected: usize = config.sources.iter().map(|s| s.endpoints.len()).sum();
    if fetched.len() != expected {
        return Err(SitemapError::Config(format!(
            "expected {expected} endpoint results, got {}",
            fetched.len()
        )));
    }

    let mut seen = HashSet::new();
    let mut records: Vec<UrlRecord> =
        static_records(&config.frontend_url, &config.static_routes, now)?
            .into_iter()
            .filter(|r| seen.insert(r.location.clone()))
            .collect();
    let mut reports = Vec::with_capacity(fetched.len());
    let mut categories = Vec::with_capacity(config.sources.len());
    let mut remaining = fetched;

    for source in &config.sources {
        let (batch, rest) = remaining.split_at(source.endpoints.len());
        remaining = rest;

        let mut entities = Vec::new();
        for (endpoint, result) in source.endpoints.iter().zip(batch) {
            let flattened = flatten(&endpoint.shape, &result.payload);
            reports.push(EndpointReport {
                path: result.path.clone(),
                succeeded: result.succeeded,
                entities: flattened.len(),
                elapsed_ms: result.elapsed_ms,
            });
            entities.extend(flattened);
        }

        let offset = records.len();
        records.extend(
            entity_records(config, source, entities, now)?
                .into_iter()
                .filter(|r| seen.insert(r.location.clone())),
        );
        categories.push(CategoryReport {
            category: source.category,
            records: records.len() - offset,
            offset,
        });
    }

    Ok(Sitemap {
        records,
        origin: SitemapOrigin::Generated,
        generated_at: now,
        endpoints: reports,
        categories,
    })
}

fn entity_records(
    config: &SitemapConfig,
    source: &EntitySource,
    entities: Vec<serde_json::Value>,
    now: DateTime<Utc>,
) -> Result<Vec<UrlRecord>> {
    let (kept, dropped) = dedupe_by_id(entities);
    if dropped > 0 {
        debug!(
            category = %source.category,
            dropped,
            "dropped duplicate or unidentified entities"
        );
    }

    let mut records = Vec::with_capacity(kept.len());
    for keyed in kept {
        let location = source.template.location(&config.frontend_url, &keyed.id)?;
        if let Err(e) = Url::parse(&location) {
            warn!(
                category = %source.category,
                id = %keyed.id,
                error = %e,
                "skipping unaddressable entity"
            );
            continue;
        }
        records.push(UrlRecord::new(
            location,
            entity_timestamp(&keyed.entity).unwrap_or(now),
            source.template.change_frequency,
            source.template.priority,
        ));
    }
    debug!(category = %source.category, count = records.len(), "entity records built");
    Ok(records)
}

/// Map static routes to records. The root is always daily with priority 1.0.
pub fn static_records(
    frontend_url: &str,
    routes: &[StaticRoute],
    now: DateTime<Utc>,
) -> Result<Vec<UrlRecord>> {
    routes
        .iter()
        .map(|route| {
            let location = page_location(frontend_url, &route.path);
            Url::parse(&location).map_err(|source| SitemapError::InvalidUrl {
                url: location.clone(),
                source,
            })?;
            let (change_frequency, priority) = if route.is_root() {
                (ChangeFrequency::Daily, Priority::MAX)
            } else {
                (route.change_frequency, route.priority)
            };
            Ok(UrlRecord::new(location, now, change_frequency, priority))
        })
        .collect()
}

/// Keep the first record for every location.
pub fn dedupe_locations(records: Vec<UrlRecord>) -> Vec<UrlRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.location.clone()))
        .collect()
}

/// The fallback sitemap: the configured fallback routes, root first.
pub fn fallback_sitemap(config: &SitemapConfig, now: DateTime<Utc>) -> Sitemap {
    let root = StaticRoute::root();
    let routes = std::iter::once(&root)
        .chain(config.fallback_routes.iter().filter(|r| !r.is_root()));

    let records = routes
        .map(|route| {
            let (change_frequency, priority) = if route.is_root() {
                (ChangeFrequency::Daily, Priority::MAX)
            } else {
                (route.change_frequency, route.priority)
            };
            UrlRecord::new(
                page_location(&config.frontend_url, &route.path),
                now,
                change_frequency,
                priority,
            )
        })
        .collect();

    Sitemap {
        records: dedupe_locations(records),
        origin: SitemapOrigin::Fallback,
        generated_at: now,
        endpoints: Vec::new(),
        categories: Vec::new(),
    }
}
