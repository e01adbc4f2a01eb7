//! Configuration module
//!
//! Handles CLI configuration: the backend URL and the watch policy overrides
//! given on the command line.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use sitescan_watcher::WatchPolicy;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the analysis backend API
    pub api_url: String,
}

/// Watch policy flags shared by `watch` and `submit --watch`
///
/// Flags override the `SITESCAN_*` environment variables.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Delay between status polls, in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Give up when the scan has not finished after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Give up after this many status polls
    #[arg(long)]
    pub max_ticks: Option<u32>,

    /// Timeout of each HTTP request, in seconds
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

impl PolicyArgs {
    /// Resolves the effective policy: defaults, then environment, then flags
    pub fn resolve(&self) -> Result<WatchPolicy> {
        self.apply(WatchPolicy::from_env())
    }

    fn apply(&self, mut policy: WatchPolicy) -> Result<WatchPolicy> {
        if let Some(ms) = self.interval_ms {
            policy = policy.with_poll_interval(Duration::from_millis(ms));
        }
        if let Some(secs) = self.timeout_secs {
            policy = policy.with_max_duration(Duration::from_secs(secs));
        }
        if let Some(ticks) = self.max_ticks {
            policy = policy.with_max_ticks(ticks);
        }
        if let Some(secs) = self.request_timeout_secs {
            policy = policy.with_request_timeout(Duration::from_secs(secs));
        }
        policy.validate()?;
        Ok(policy)
    }
}
