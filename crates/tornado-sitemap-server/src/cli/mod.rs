//! Command-line interface for the `tornado-sitemap` binary.

pub mod doctor;
pub mod generate_cmd;
pub mod output;
pub mod serve;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tornado_sitemap::SitemapConfig;

#[derive(Parser, Debug)]
#[command(
    name = "tornado-sitemap",
    version,
    about = "Generate and serve the Tornado Watch sitemap"
)]
pub struct Cli {
    /// JSON config file. Without it, TORNADO_* environment variables are used.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Machine-readable output.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress progress output.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve sitemap.xml, sitemap.json and robots.txt over HTTP.
    Serve {
        /// Listen address [env: TORNADO_BIND, default: 0.0.0.0:3000]
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Seconds a generated sitemap is reused.
        #[arg(long, default_value_t = 3600)]
        cache_ttl: u64,
    },

    /// Generate the sitemap once and print or save it.
    Generate {
        #[arg(long, value_enum, default_value_t = Format::Xml)]
        format: Format,

        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Check a deployed site's robots.txt and sitemap.
    Doctor {
        /// Site root, e.g. https://tornado-livid.vercel.app
        site: String,

        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xml,
    Json,
}

/// Load the aggregator config from `path`, or from the environment.
pub fn load_config(path: Option<&Path>) -> Result<SitemapConfig> {
    match path {
        Some(path) => SitemapConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => SitemapConfig::from_env().context("invalid TORNADO_* environment"),
    }
}
