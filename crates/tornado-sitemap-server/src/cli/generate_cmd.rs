//! `tornado-sitemap generate` — one-shot sitemap generation.

use crate::cli::output::{self, Styled};
use crate::cli::Format;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tornado_sitemap::{Sitemap, SitemapAggregator, SitemapConfig};

/// Generate the sitemap and write it to `output` (or stdout).
pub async fn run(config: SitemapConfig, format: Format, output: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let aggregator = SitemapAggregator::new(config).context("invalid sitemap configuration")?;
    let sitemap = aggregator.generate().await;

    let body = render(&sitemap, format)?;
    match output {
        Some(path) => std::fs::write(path, &body)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{body}"),
    }

    if output::is_json() {
        if output.is_some() {
            output::print_json(&summary_json(&sitemap));
        }
        return Ok(());
    }

    if !output::is_quiet() {
        print_summary(&sitemap, start.elapsed().as_millis(), output);
    }
    Ok(())
}

/// Serialize in the requested format.
pub fn render(sitemap: &Sitemap, format: Format) -> Result<String> {
    let body = match format {
        Format::Xml => sitemap.to_xml()?,
        Format::Json => sitemap.to_json()?,
    };
    Ok(body)
}

fn summary_json(sitemap: &Sitemap) -> serde_json::Value {
    let categories: serde_json::Map<String, serde_json::Value> = sitemap
        .categories
        .iter()
        .map(|report| {
            (
                report.category.label().to_string(),
                serde_json::Value::from(report.records),
            )
        })
        .collect();

    serde_json::json!({
        "origin": sitemap.origin,
        "records": sitemap.len(),
        "generated_at": sitemap.generated_at,
        "categories": categories,
        "endpoints": sitemap.endpoints,
    })
}

fn print_summary(sitemap: &Sitemap, elapsed_ms: u128, output: Option<&Path>) {
    let s = Styled::new();
    let sym = if sitemap.is_fallback() {
        s.warn_sym()
    } else {
        s.ok_sym()
    };

    eprintln!();
    eprintln!("  {}", s.bold("Sitemap"));
    output::print_check(sym, "Records:", &format!("{} ({elapsed_ms} ms)", sitemap.len()));
    if sitemap.is_fallback() {
        output::print_check(s.warn_sym(), "Origin:", "fallback (generation failed, see logs)");
    }
    for report in &sitemap.categories {
        output::print_check(
            s.ok_sym(),
            &format!("{}:", report.category),
            &report.records.to_string(),
        );
    }
    for endpoint in &sitemap.endpoints {
        let (sym, status) = if endpoint.succeeded {
            (s.ok_sym(), format!("{} entities", endpoint.entities))
        } else {
            (s.fail_sym(), "unavailable, treated as empty".to_string())
        };
        output::print_check(sym, &endpoint.path, &s.dim(&status));
    }
    if let Some(path) = output {
        eprintln!("  Written to {}", path.display());
    }
}
