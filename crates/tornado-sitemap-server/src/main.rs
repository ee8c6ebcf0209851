use anyhow::Result;
use clap::Parser;
use tornado_sitemap_server::cli::{self, Cli, Command};
use tornado_sitemap_server::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        std::env::set_var("TORNADO_QUIET", "1");
    }
    if cli.json {
        std::env::set_var("TORNADO_JSON", "1");
    }
    telemetry::init_tracing(cli.log_json);

    match cli.command {
        Command::Serve { bind, cache_ttl } => {
            let config = cli::load_config(cli.config.as_deref())?;
            cli::serve::run(config, bind, cache_ttl).await
        }
        Command::Generate { format, output } => {
            let config = cli::load_config(cli.config.as_deref())?;
            cli::generate_cmd::run(config, format, output.as_deref()).await
        }
        Command::Doctor { site, timeout_ms } => {
            if !cli::doctor::run(&site, timeout_ms).await? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
