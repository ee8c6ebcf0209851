//! `tornado-sitemap doctor <site>` — SEO readiness check for a deployed site.
//!
//! Verifies that robots.txt exists, lets crawlers reach the root, and
//! advertises a sitemap; then fetches every advertised sitemap and checks
//! that it is well-formed and lists the site root.

use crate::cli::output::{self, Styled};
use crate::robots::parse_robots;
use anyhow::Result;
use serde::Serialize;
use std::time::Duration;
use tornado_sitemap::acquisition::http_client::HttpClient;
use tornado_sitemap::cartography::record::page_location;
use tornado_sitemap::render::xml::parse_locations;

const CRAWLER_AGENT: &str = "Googlebot";
const MAX_SITEMAPS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

/// One line of the doctor report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub label: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl Check {
    fn new(label: &str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            status,
            detail: detail.into(),
        }
    }
}

/// Run the check and print the report. Returns whether every check passed
/// (warnings allowed).
pub async fn run(site: &str, timeout_ms: u64) -> Result<bool> {
    let client = HttpClient::new(Duration::from_millis(timeout_ms))?;
    let checks = audit(site, &client).await;
    let healthy = checks.iter().all(|c| c.status != CheckStatus::Fail);

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "site": site,
            "healthy": healthy,
            "checks": checks,
        }));
        return Ok(healthy);
    }

    if !output::is_quiet() {
        let s = Styled::new();
        eprintln!();
        eprintln!("  {} {}", s.bold("SEO check"), s.dim(site));
        for check in &checks {
            let sym = match check.status {
                CheckStatus::Ok => s.ok_sym(),
                CheckStatus::Warn => s.warn_sym(),
                CheckStatus::Fail => s.fail_sym(),
            };
            output::print_check(sym, &check.label, &check.detail);
        }
        eprintln!();
        let verdict = if healthy { "ready" } else { "not ready" };
        eprintln!("  {}: {verdict}", s.bold("Status"));
    }

    Ok(healthy)
}

/// Collect the checks for `site` without printing anything.
pub async fn audit(site: &str, client: &HttpClient) -> Vec<Check> {
    let mut checks = Vec::new();
    let root = page_location(site, "");
    let mut sitemap_urls = Vec::new();

    match client.get_text(&page_location(site, "robots.txt")).await {
        Ok((200, body)) => {
            checks.push(Check::new("robots.txt", CheckStatus::Ok, "found"));
            let rules = parse_robots(&body, CRAWLER_AGENT);

            if rules.is_allowed("/") {
                checks.push(Check::new("Crawlable root", CheckStatus::Ok, "allowed"));
            } else {
                checks.push(Check::new(
                    "Crawlable root",
                    CheckStatus::Fail,
                    "robots.txt disallows /",
                ));
            }

            if rules.sitemaps.is_empty() {
                checks.push(Check::new(
                    "Sitemap directive",
                    CheckStatus::Fail,
                    "robots.txt has no Sitemap: reference",
                ));
            } else {
                checks.push(Check::new(
                    "Sitemap directive",
                    CheckStatus::Ok,
                    rules.sitemaps.join(", "),
                ));
                sitemap_urls = rules.sitemaps;
            }
        }
        Ok((status, _)) => checks.push(Check::new(
            "robots.txt",
            CheckStatus::Fail,
            format!("status {status}"),
        )),
        Err(e) => checks.push(Check::new(
            "robots.txt",
            CheckStatus::Fail,
            format!("unreachable: {e}"),
        )),
    }

    if sitemap_urls.is_empty() {
        sitemap_urls.push(page_location(site, "sitemap.xml"));
    }

    let mut lists_root = false;
    for url in sitemap_urls.iter().take(MAX_SITEMAPS) {
        match client.get_text(url).await {
            Ok((200, body)) => match parse_locations(&body) {
                Ok(locations) if locations.is_empty() => {
                    checks.push(Check::new(
                        url,
                        CheckStatus::Warn,
                        "well-formed but lists no URLs",
                    ));
                }
                Ok(locations) => {
                    lists_root |= locations.iter().any(|l| same_page(l, &root));
                    checks.push(Check::new(
                        url,
                        CheckStatus::Ok,
                        format!("{} URLs", locations.len()),
                    ));
                }
                Err(e) => checks.push(Check::new(
                    url,
                    CheckStatus::Fail,
                    format!("malformed: {e}"),
                )),
            },
            Ok((status, _)) => {
                checks.push(Check::new(url, CheckStatus::Fail, format!("status {status}")))
            }
            Err(e) => checks.push(Check::new(
                url,
                CheckStatus::Fail,
                format!("unreachable: {e}"),
            )),
        }
    }

    let any_sitemap_ok = checks
        .iter()
        .any(|c| c.status == CheckStatus::Ok && sitemap_urls.contains(&c.label));
    if any_sitemap_ok {
        let status = if lists_root {
            CheckStatus::Ok
        } else {
            CheckStatus::Warn
        };
        let detail = if lists_root {
            "listed"
        } else {
            "site root missing from sitemap"
        };
        checks.push(Check::new("Root URL", status, detail));
    }

    checks
}

fn same_page(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
