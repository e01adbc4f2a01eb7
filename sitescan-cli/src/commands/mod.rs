//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod health;
mod scan;

use anyhow::Result;
use clap::Subcommand;

use crate::config::{Config, PolicyArgs};
use crate::render::PanelKind;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start a new website scan
    Submit {
        /// Website URL (must start with http:// or https://)
        url: String,

        /// Maximum number of pages to crawl
        #[arg(long, default_value_t = sitescan_core::dto::scan::DEFAULT_MAX_PAGES)]
        max_pages: u32,

        /// Also follow links to external domains
        #[arg(long)]
        include_external: bool,

        /// Follow the scan until it finishes and print the report
        #[arg(short, long)]
        watch: bool,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Show the current status of a scan
    Status {
        /// Scan ID returned by `submit`
        scan_id: String,
    },
    /// Follow a scan until it finishes and print the report
    Watch {
        /// Scan ID returned by `submit`
        scan_id: String,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Check that the backend is reachable
    Health,
}

/// Options controlling how a finished scan is watched and rendered
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Only print these panels (repeatable)
    #[arg(long = "panel", value_enum)]
    pub panels: Vec<PanelKind>,

    /// Include the backend traceback when the scan failed
    #[arg(long)]
    pub show_trace: bool,

    /// Print the settled result as JSON instead of panels
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Submit {
            url,
            max_pages,
            include_external,
            watch,
            report,
        } => {
            scan::submit(config, &url, max_pages, include_external, watch.then_some(report)).await
        }
        Commands::Status { scan_id } => scan::status(config, &scan_id).await,
        Commands::Watch { scan_id, report } => scan::watch(config, &scan_id, &report).await,
        Commands::Health => health::check(config).await,
    }
}
