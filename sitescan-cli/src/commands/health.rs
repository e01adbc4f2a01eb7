//! Health command handler

use anyhow::{Context, Result};
use colored::*;
use sitescan_client::ScanClient;

use crate::config::Config;

/// Probe the backend and print its answer
pub async fn check(config: &Config) -> Result<()> {
    let client = ScanClient::new(&config.api_url);
    let health = client
        .health()
        .await
        .with_context(|| format!("Backend at {} is not reachable", config.api_url))?;

    let status = if health.status == "healthy" {
        health.status.green()
    } else {
        health.status.yellow()
    };
    println!("Backend: {}", config.api_url.dimmed());
    println!("Status:  {}", status);
    if let Some(ts) = health.timestamp {
        println!("Time:    {}", ts.dimmed());
    }

    Ok(())
}
