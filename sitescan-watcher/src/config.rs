//! Watch policy
//!
//! Defines the configurable parameters of a job-viewing session: how often
//! the status endpoint is polled and which guards stop a session that never
//! reaches a terminal state.

use std::time::Duration;

/// Reference poll interval of the status endpoint
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Watch policy
///
/// The defaults reproduce the reference behaviour: poll every two seconds,
/// forever, with no per-request timeout. Both guards are opt-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchPolicy {
    /// Delay between two status polls
    pub poll_interval: Duration,

    /// Give up after this much wall time
    pub max_duration: Option<Duration>,

    /// Give up after this many status polls
    pub max_ticks: Option<u32>,

    /// Timeout applied to every individual HTTP request
    pub request_timeout: Option<Duration>,
}

impl WatchPolicy {
    /// Creates a policy with the reference interval and no guards
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_duration: None,
            max_ticks: None,
            request_timeout: None,
        }
    }

    /// Creates a policy from environment variables
    ///
    /// Recognised environment variables (all optional):
    /// - SITESCAN_POLL_INTERVAL_MS (default: 2000)
    /// - SITESCAN_MAX_DURATION_SECS (default: unbounded)
    /// - SITESCAN_MAX_TICKS (default: unbounded)
    /// - SITESCAN_REQUEST_TIMEOUT_SECS (default: none)
    ///
    /// Values that do not parse fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        Self {
            poll_interval: number("SITESCAN_POLL_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            max_duration: number("SITESCAN_MAX_DURATION_SECS").map(Duration::from_secs),
            max_ticks: number("SITESCAN_MAX_TICKS").and_then(|n| u32::try_from(n).ok()),
            request_timeout: number("SITESCAN_REQUEST_TIMEOUT_SECS").map(Duration::from_secs),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Validates the policy
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_ticks == Some(0) {
            anyhow::bail!("max_ticks must be greater than 0");
        }

        if self.max_duration.is_some_and(|d| d.is_zero()) {
            anyhow::bail!("max_duration must be greater than 0");
        }

        if self.request_timeout.is_some_and(|d| d.is_zero()) {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds the HTTP client the session should use
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

impl Default for WatchPolicy {
    fn default() -> Self {
        Self::new()
    }
}
