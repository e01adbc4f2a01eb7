//! Sitescan CLI
//!
//! Command-line front-end for the website-analysis backend: submit a scan,
//! follow it to completion and render the report.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sitescan")]
#[command(about = "Website SEO analysis client", long_about = None)]
struct Cli {
    /// Backend API base URL
    #[arg(long, env = "SITESCAN_API_URL", default_value = "http://localhost:8000/api")]
    api_url: String,

    /// Log polling activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "sitescan=info,sitescan_watcher=info,sitescan_client=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config {
        api_url: cli.api_url,
    };

    handle_command(cli.command, &config).await
}
