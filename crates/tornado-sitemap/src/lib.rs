//! Sitemap aggregation for the Tornado Watch storefront.
//!
//! The aggregator polls a declarative list of catalogue endpoints
//! concurrently, flattens their heterogeneous payloads into entity lists,
//! keeps the first occurrence of every identifier, and maps static pages and
//! entities to [`UrlRecord`]s. The resulting [`Sitemap`] renders either as
//! Sitemaps-protocol XML or as a structured JSON list.
//!
//! Generation never fails from the caller's point of view: per-endpoint
//! failures degrade to empty payloads, and anything worse is replaced by a
//! small static fallback sitemap.

pub mod acquisition;
pub mod cartography;
pub mod config;
pub mod error;
pub mod render;

pub use acquisition::endpoint::{Endpoint, PayloadShape};
pub use cartography::aggregator::{
    CategoryReport, EndpointReport, Sitemap, SitemapAggregator, SitemapOrigin,
};
pub use cartography::record::{ChangeFrequency, Priority, UrlRecord};
pub use cartography::source::{EntityCategory, EntitySource, EntityTemplate};
pub use config::{SitemapConfig, StaticRoute};
pub use error::{Result, SitemapError};
