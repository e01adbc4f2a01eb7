//! Scan command handlers
//!
//! Submitting a scan, showing its status, and following it to a rendered
//! report.

use anyhow::{Result, bail};
use colored::*;
use sitescan_client::{ClientError, ScanClient};
use sitescan_core::domain::job::{JobState, JobStatus};
use sitescan_core::domain::view::ResultViewModel;
use sitescan_core::dto::scan::ScanRequest;
use sitescan_watcher::{ScanWatcher, WatchOutcome};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::ReportArgs;
use crate::config::Config;
use crate::render::{self, ErrorView};

/// Shown when the backend rejects a submission without saying why
const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to start scan. Please try again.";

/// Submit a new scan, optionally following it to completion
pub async fn submit(
    config: &Config,
    url: &str,
    max_pages: u32,
    include_external: bool,
    watch_with: Option<ReportArgs>,
) -> Result<()> {
    let client = ScanClient::new(&config.api_url);
    let request = ScanRequest {
        url: url.trim().to_string(),
        max_pages,
        include_external,
    };

    let ack = match client.submit_scan(&request).await {
        Ok(ack) => ack,
        Err(e) => bail!("{}", submit_error_message(&e)),
    };

    println!("{}", "✓ Scan started".green());
    println!("  Scan ID: {}", ack.scan_id.cyan());
    println!("  URL:     {}", request.url);
    println!("  Pages:   {}", request.max_pages);
    if !ack.message.is_empty() {
        println!("  {}", ack.message.dimmed());
    }

    match watch_with {
        Some(report) => {
            println!();
            watch(config, &ack.scan_id, &report).await
        }
        None => {
            println!();
            println!(
                "{}",
                format!("Follow it with: sitescan watch {}", ack.scan_id).dimmed()
            );
            Ok(())
        }
    }
}

/// Show the current status of a scan
pub async fn status(config: &Config, scan_id: &str) -> Result<()> {
    let client = ScanClient::new(&config.api_url);

    let status = match client.get_status(scan_id).await {
        Ok(status) => status,
        Err(ClientError::NotFound(_)) => bail!("Scan {} not found", scan_id),
        Err(e) => return Err(e.into()),
    };

    println!("{}", "Scan Status:".bold());
    println!("  ID:     {}", scan_id.cyan());
    println!("  Status: {}", colorize_state(status.status));
    if let Some(message) = &status.message {
        println!("  {}", message.dimmed());
    }

    Ok(())
}

/// Follow a scan until it settles and render the outcome
///
/// Ctrl-C cancels the session; nothing is rendered afterwards.
pub async fn watch(config: &Config, scan_id: &str, report: &ReportArgs) -> Result<()> {
    let policy = report.policy.resolve()?;
    debug!(?policy, "Resolved watch policy");
    let watcher = ScanWatcher::connect(&config.api_url, policy)?;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut progress = Progress::default();
    let outcome = watcher
        .watch(scan_id, &cancel, |status| progress.update(status))
        .await;
    ctrl_c.abort();

    match outcome {
        WatchOutcome::Cancelled => {
            println!("{}", "Cancelled.".yellow());
            Ok(())
        }
        WatchOutcome::Settled(model) => render_outcome(scan_id, &model, report),
    }
}

fn render_outcome(scan_id: &str, model: &ResultViewModel, report: &ReportArgs) -> Result<()> {
    if report.json {
        println!("{}", serde_json::to_string_pretty(model)?);
        return match model.error() {
            Some(error) => bail!("Scan {} failed ({})", scan_id, error.kind),
            None => Ok(()),
        };
    }

    match model {
        ResultViewModel::Ready(payload) => {
            render::print_report(scan_id, payload, &report.panels);
            Ok(())
        }
        ResultViewModel::Failed(error) => {
            render::print_error(&ErrorView::new(error, report.show_trace));
            bail!("Scan {} failed ({})", scan_id, error.kind)
        }
        ResultViewModel::Pending => {
            warn!(scan_id, "Session ended without a settled result");
            bail!("Scan {} has no result yet", scan_id)
        }
    }
}

/// Message shown when a submission is refused
fn submit_error_message(error: &ClientError) -> String {
    match error {
        ClientError::InvalidRequest(reason) => reason.clone(),
        ClientError::ApiError { message, .. } if !message.trim().is_empty() => message.clone(),
        _ => SUBMIT_FALLBACK_MESSAGE.to_string(),
    }
}

/// Prints one progress line per state change
#[derive(Default)]
struct Progress {
    last: Option<JobState>,
}

impl Progress {
    fn update(&mut self, status: &JobStatus) {
        if self.last == Some(status.status) {
            return;
        }
        self.last = Some(status.status);
        if let Some(text) = progress_message(status.status) {
            eprintln!("{} {}", "⋯".cyan(), text);
        }
    }
}

/// Progress text for a non-terminal state
fn progress_message(state: JobState) -> Option<&'static str> {
    match state {
        JobState::Pending => Some("Starting scan..."),
        JobState::Processing => Some("Scanning website..."),
        JobState::Completed | JobState::Error => None,
    }
}

fn colorize_state(state: JobState) -> ColoredString {
    match state {
        JobState::Pending => state.as_str().yellow(),
        JobState::Processing => state.as_str().blue(),
        JobState::Completed => state.as_str().green(),
        JobState::Error => state.as_str().red(),
    }
}
