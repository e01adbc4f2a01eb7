//! Job-viewing session
//!
//! Drives one scan from its first status poll to a settled view model:
//! poll until terminal, fetch the result, and go back to polling after one
//! interval if the result turned out not to be stored yet. The whole session
//! shares a single [`PollGuard`] and a single cancellation token.

use std::sync::Arc;

use sitescan_client::ScanClient;
use sitescan_core::domain::error::ErrorDescriptor;
use sitescan_core::domain::job::JobStatus;
use sitescan_core::domain::view::ResultViewModel;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::WatchPolicy;
use crate::reconciler::ResultReconciler;
use crate::repository::{HttpScanRepository, ScanRepository};
use crate::scheduler::{GuardLimit, JobStatusTracker, PollGuard, TrackOutcome};

/// How a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum WatchOutcome {
    /// A terminal view model was produced
    Settled(ResultViewModel),
    /// The owner abandoned the session; nothing should be rendered
    Cancelled,
}

/// Tracks and reconciles scans against one backend
pub struct ScanWatcher {
    policy: WatchPolicy,
    tracker: JobStatusTracker,
    reconciler: ResultReconciler,
}

impl ScanWatcher {
    pub fn new(repository: Arc<dyn ScanRepository>, policy: WatchPolicy) -> Self {
        Self {
            tracker: JobStatusTracker::new(Arc::clone(&repository), policy.poll_interval),
            reconciler: ResultReconciler::new(repository),
            policy,
        }
    }

    /// Creates a watcher talking HTTP to `base_url`
    ///
    /// The policy's request timeout, if any, is applied to every request.
    pub fn connect(base_url: impl Into<String>, policy: WatchPolicy) -> anyhow::Result<Self> {
        policy.validate()?;
        let client = ScanClient::with_client(base_url, policy.http_client()?);
        Ok(Self::new(Arc::new(HttpScanRepository::new(client)), policy))
    }

    pub fn policy(&self) -> &WatchPolicy {
        &self.policy
    }

    /// Watches `scan_id` until its view model settles or `cancel` fires
    ///
    /// `on_status` is called with every status record received. When the
    /// policy's guard runs out, whether during status polling, the result
    /// fetch or the back-off after a not-ready answer, the session settles as
    /// `Failed` with kind `Timeout`. A blank scan id settles as `Failed` with
    /// kind `InvalidRequest` before any request. A scan already settled by
    /// this watcher is answered from memory without any request.
    pub async fn watch<F>(
        &self,
        scan_id: &str,
        cancel: &CancellationToken,
        mut on_status: F,
    ) -> WatchOutcome
    where
        F: FnMut(&JobStatus),
    {
        if scan_id.trim().is_empty() {
            warn!("Refusing to watch a scan with a blank id");
            return WatchOutcome::Settled(ResultViewModel::Failed(
                ErrorDescriptor::invalid_request("Scan id cannot be empty"),
            ));
        }

        if let Some(model) = self.reconciler.settled_model(scan_id) {
            debug!(scan_id, "Scan already settled");
            return WatchOutcome::Settled(model);
        }

        let mut guard = PollGuard::new(self.policy.max_ticks, self.policy.max_duration);

        loop {
            let status = match self
                .tracker
                .observe(scan_id, &mut guard, cancel, &mut on_status)
                .await
            {
                TrackOutcome::Terminal(status) => status,
                TrackOutcome::Cancelled => return WatchOutcome::Cancelled,
                TrackOutcome::Exhausted(limit) => return timed_out(limit),
            };

            let model = tokio::select! {
                biased;
                _ = cancel.cancelled() => return WatchOutcome::Cancelled,
                limit = guard.expired() => {
                    warn!(scan_id, %limit, "Watch budget ran out while fetching the result");
                    return timed_out(limit);
                }
                model = self.reconciler.fetch_and_normalize(scan_id, status.status) => model,
            };

            if cancel.is_cancelled() {
                return WatchOutcome::Cancelled;
            }

            if model.is_settled() {
                return WatchOutcome::Settled(model);
            }

            info!(
                scan_id,
                retry_in = ?self.policy.poll_interval,
                "Result not stored yet, polling again"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return WatchOutcome::Cancelled,
                limit = guard.expired() => {
                    warn!(scan_id, %limit, "Watch budget ran out before the result was stored");
                    return timed_out(limit);
                }
                _ = time::sleep(self.policy.poll_interval) => {}
            }
        }
    }
}

fn timed_out(limit: GuardLimit) -> WatchOutcome {
    WatchOutcome::Settled(ResultViewModel::Failed(ErrorDescriptor::timeout(
        limit.to_string(),
    )))
}
