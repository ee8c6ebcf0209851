//! Thin JSON-over-HTTP client shared by every endpoint fetch.

use crate::error::Result;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Why a single upstream fetch produced no usable payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("upstream answered with status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("body is not valid JSON: {0}")]
    Decode(String),
}

/// A pooled `reqwest` client with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(concat!("tornado-sitemap/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { inner, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// Only 2xx responses are decoded. The timeout covers connecting,
    /// waiting for headers and reading the body.
    pub async fn get_json(&self, url: &str) -> std::result::Result<Value, FetchFailure> {
        let resp = self
            .inner
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(classify)?;
        serde_json::from_slice(&body).map_err(|e| FetchFailure::Decode(e.to_string()))
    }

    /// GET `url` and return the status code and body text, whatever the status.
    pub async fn get_text(&self, url: &str) -> std::result::Result<(u16, String), FetchFailure> {
        let resp = self
            .inner
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(classify)?;
        Ok((status, body))
    }
}

fn classify(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::Timeout
    } else {
        FetchFailure::Transport(err.to_string())
    }
}
