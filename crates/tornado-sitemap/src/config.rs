//! Aggregator configuration: base URLs, static pages, fallback pages and
//! the entity sources to poll.

use crate::cartography::record::{ChangeFrequency, Priority};
use crate::cartography::source::{tornado_sources, EntitySource};
use crate::error::{Result, SitemapError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Production storefront API.
pub const DEFAULT_API_URL: &str = "https://0vm9jauvgc.execute-api.us-east-1.amazonaws.com/stag/api";
/// Production storefront frontend.
pub const DEFAULT_FRONTEND_URL: &str = "https://tornado-livid.vercel.app/";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// A hand-maintained page that is listed whatever the API returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticRoute {
    /// Path relative to the frontend base. Empty for the site root.
    pub path: String,
    pub priority: Priority,
    pub change_frequency: ChangeFrequency,
}

impl StaticRoute {
    pub fn new(path: &str, priority: f32, change_frequency: ChangeFrequency) -> Self {
        Self {
            path: path.to_string(),
            priority: Priority::new(priority),
            change_frequency,
        }
    }

    pub fn root() -> Self {
        Self::new("", 1.0, ChangeFrequency::Daily)
    }

    pub fn is_root(&self) -> bool {
        self.path.trim_matches('/').is_empty()
    }
}

/// Everything the aggregator needs. Nothing is read from process globals
/// once this is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapConfig {
    pub api_url: String,
    pub frontend_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_static_routes")]
    pub static_routes: Vec<StaticRoute>,
    #[serde(default = "default_fallback_routes")]
    pub fallback_routes: Vec<StaticRoute>,
    #[serde(default = "tornado_sources")]
    pub sources: Vec<EntitySource>,
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Storefront pages, in sitemap order.
pub fn default_static_routes() -> Vec<StaticRoute> {
    use ChangeFrequency::*;
    vec![
        StaticRoute::root(),
        StaticRoute::new("shop", 0.9, Weekly),
        StaticRoute::new("about-us", 0.8, Monthly),
        StaticRoute::new("contact-us", 0.7, Monthly),
        StaticRoute::new("featured", 0.8, Weekly),
        StaticRoute::new("blog", 0.7, Weekly),
        StaticRoute::new("faqs", 0.6, Monthly),
        StaticRoute::new("privacy-policy", 0.5, Yearly),
        StaticRoute::new("term-of-use", 0.5, Yearly),
        StaticRoute::new("shipping-delivery", 0.6, Monthly),
        StaticRoute::new("profile", 0.4, Monthly),
    ]
}

/// Pages served when generation fails outright.
pub fn default_fallback_routes() -> Vec<StaticRoute> {
    use ChangeFrequency::*;
    vec![
        StaticRoute::root(),
        StaticRoute::new("shop", 0.9, Weekly),
        StaticRoute::new("about-us", 0.8, Monthly),
        StaticRoute::new("contact-us", 0.7, Monthly),
    ]
}

impl SitemapConfig {
    /// The storefront catalogue against the given API and frontend.
    pub fn tornado(api_url: &str, frontend_url: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            frontend_url: frontend_url.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            static_routes: default_static_routes(),
            fallback_routes: default_fallback_routes(),
            sources: tornado_sources(),
        }
    }

    /// Build from `TORNADO_API_URL`, `TORNADO_FRONTEND_URL` and
    /// `TORNADO_REQUEST_TIMEOUT_MS`, falling back to production values.
    pub fn from_env() -> Result<Self> {
        let api_url = env_or("TORNADO_API_URL", DEFAULT_API_URL);
        let frontend_url = env_or("TORNADO_FRONTEND_URL", DEFAULT_FRONTEND_URL);
        let mut config = Self::tornado(&api_url, &frontend_url);

        if let Ok(raw) = std::env::var("TORNADO_REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = raw.trim().parse().map_err(|e| {
                SitemapError::Config(format!("TORNADO_REQUEST_TIMEOUT_MS={raw:?}: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file. Omitted tables take the storefront defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Check base URLs, timeout and templates.
    pub fn validate(&self) -> Result<()> {
        for url in [&self.api_url, &self.frontend_url] {
            Url::parse(url).map_err(|source| SitemapError::InvalidUrl {
                url: url.clone(),
                source,
            })?;
        }
        if self.request_timeout_ms == 0 {
            return Err(SitemapError::Config(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        for source in &self.sources {
            source.template.validate()?;
        }
        Ok(())
    }

    /// Every endpoint path across all sources, in polling order.
    pub fn endpoint_paths(&self) -> Vec<&str> {
        self.sources
            .iter()
            .flat_map(|s| s.endpoints.iter().map(|e| e.path.as_str()))
            .collect()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_tornado_config_is_valid() {
        let config = SitemapConfig::tornado(DEFAULT_API_URL, DEFAULT_FRONTEND_URL);
        config.validate().unwrap();
        assert_eq!(
            config.endpoint_paths(),
            vec![
                "/products/new-arrivals",
                "/products/all",
                "/collection",
                "/categories/all",
                "/blogs"
            ]
        );
        assert!(config.static_routes[0].is_root());
        assert!(config.fallback_routes[0].is_root());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let config = SitemapConfig::tornado("not a url", "https://example.test");
        assert!(matches!(
            config.validate(),
            Err(SitemapError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = SitemapConfig::tornado("https://api.example.test", "https://example.test");
        config.request_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(SitemapError::Config(_))));
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "api_url": "https://api.example.test",
                "frontend_url": "https://example.test",
                "static_routes": [
                    {{"path": "", "priority": 1.0, "change_frequency": "daily"}},
                    {{"path": "shop", "priority": 0.9, "change_frequency": "weekly"}}
                ]
            }}"#
        )
        .unwrap();

        let config = SitemapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.static_routes.len(), 2);
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.sources, tornado_sources());
        assert_eq!(config.fallback_routes, default_fallback_routes());
    }

    #[test]
    fn test_from_file_rejects_template_without_id() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "api_url": "https://api.example.test",
                "frontend_url": "https://example.test",
                "sources": [{{
                    "category": "blog",
                    "endpoints": [{{
                        "path": "/blogs",
                        "shape": {{"kind": "wrapped_list", "keys": ["blogs"]}}
                    }}],
                    "template": {{
                        "path_pattern": "blog-details",
                        "change_frequency": "monthly",
                        "priority": 0.6
                    }}
                }}]
            }}"#
        )
        .unwrap();

        assert!(matches!(
            SitemapConfig::from_file(file.path()),
            Err(SitemapError::Template(_))
        ));
    }
}
