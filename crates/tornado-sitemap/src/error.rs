//! Error type for sitemap configuration, assembly and rendering.

use thiserror::Error;

/// Errors raised while configuring, assembling or rendering a sitemap.
///
/// Upstream fetch failures are not represented here: they degrade to empty
/// payloads inside the acquisition layer and never abort generation.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("url template {0:?} has no {{id}} placeholder")]
    Template(String),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SitemapError>;
