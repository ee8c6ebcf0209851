//! Sitemap serialization: Sitemaps-protocol XML and structured JSON.

pub mod xml;

use crate::cartography::record::UrlRecord;
use crate::error::Result;

/// Serialize records as a pretty-printed JSON array of
/// `{url, lastModified, changeFrequency, priority}` objects.
pub fn records_to_json(records: &[UrlRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
