//! URL records: the unit a sitemap is made of.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a page is expected to change (Sitemaps protocol `changefreq`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub const ALL: [ChangeFrequency; 7] = [
        Self::Always,
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::Never,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|freq| freq.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown change frequency: {s}"))
    }
}

/// Crawl priority hint, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Priority(f32);

impl Priority {
    pub const MAX: Priority = Priority(1.0);

    /// Clamp `value` into range. NaN becomes the protocol default of 0.5.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self(0.5)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl From<f32> for Priority {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Priority> for f32 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// One `<url>` entry. Serializes as `{url, lastModified, changeFrequency, priority}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    #[serde(rename = "url")]
    pub location: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: Priority,
}

impl UrlRecord {
    pub fn new(
        location: String,
        last_modified: DateTime<Utc>,
        change_frequency: ChangeFrequency,
        priority: Priority,
    ) -> Self {
        Self {
            location,
            last_modified,
            change_frequency,
            priority,
        }
    }
}

/// Join a frontend base URL and a page path with exactly one slash.
///
/// An empty path yields the base with a trailing slash (the site root).
pub fn page_location(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
