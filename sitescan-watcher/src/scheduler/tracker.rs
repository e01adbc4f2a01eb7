//! Job status tracker
//!
//! Polls the status endpoint of one scan on a fixed interval until the job
//! reaches a terminal state. Polls are strictly sequential: the next tick is
//! only scheduled once the previous request has completed.

use std::fmt;
use std::sync::Arc;

use sitescan_core::domain::job::JobStatus;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::repository::ScanRepository;

/// How a tracking run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The job reached `completed` or `error`
    Terminal(JobStatus),
    /// The owning session was cancelled
    Cancelled,
    /// The poll guard refused another tick
    Exhausted(GuardLimit),
}

/// Which guard stopped a tracking run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardLimit {
    Ticks(u32),
    Duration(Duration),
}

impl fmt::Display for GuardLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticks(n) => write!(f, "{} status polls", n),
            Self::Duration(d) => write!(f, "{}s", d.as_secs_f64()),
        }
    }
}

/// Budget shared by every poll of one session
///
/// The tracker itself never gives up; a guard built with limits is what turns
/// a job that never terminates into a timeout.
#[derive(Debug, Clone)]
pub struct PollGuard {
    max_ticks: Option<u32>,
    max_duration: Option<Duration>,
    deadline: Option<Instant>,
    ticks: u32,
}

impl PollGuard {
    /// A guard that admits every tick
    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// Starts the clock for a guard with the given limits
    pub fn new(max_ticks: Option<u32>, max_duration: Option<Duration>) -> Self {
        Self {
            max_ticks,
            max_duration,
            deadline: max_duration.map(|d| Instant::now() + d),
            ticks: 0,
        }
    }

    /// Number of polls admitted so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    fn admit(&mut self) -> Result<(), GuardLimit> {
        if let Some(max) = self.max_ticks {
            if self.ticks >= max {
                return Err(GuardLimit::Ticks(max));
            }
        }
        if let Some(limit) = self.duration_exceeded() {
            return Err(limit);
        }
        self.ticks += 1;
        Ok(())
    }

    fn duration_exceeded(&self) -> Option<GuardLimit> {
        match (self.deadline, self.max_duration) {
            (Some(deadline), Some(max)) if Instant::now() >= deadline => {
                Some(GuardLimit::Duration(max))
            }
            _ => None,
        }
    }

    /// Resolves when the duration budget runs out; never if there is none
    pub(crate) async fn expired(&self) -> GuardLimit {
        match (self.deadline, self.max_duration) {
            (Some(deadline), Some(max)) => {
                time::sleep_until(deadline).await;
                GuardLimit::Duration(max)
            }
            _ => std::future::pending().await,
        }
    }
}

/// Polls one scan's status until it is terminal
pub struct JobStatusTracker {
    repository: Arc<dyn ScanRepository>,
    interval: Duration,
}

impl JobStatusTracker {
    /// Creates a tracker polling every `interval`
    pub fn new(repository: Arc<dyn ScanRepository>, interval: Duration) -> Self {
        Self {
            repository,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls until a terminal state, cancellation or guard exhaustion
    ///
    /// The first request is issued immediately. `on_status` sees every status
    /// record received before the run ends. A failed poll is logged and
    /// retried on the next tick; only a terminal state ends tracking.
    ///
    /// Cancellation wins over everything: a pending tick never fires and a
    /// response that arrives after cancellation is discarded.
    pub async fn observe<F>(
        &self,
        scan_id: &str,
        guard: &mut PollGuard,
        cancel: &CancellationToken,
        mut on_status: F,
    ) -> TrackOutcome
    where
        F: FnMut(&JobStatus),
    {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(scan_id, guard),
                limit = guard.expired() => return self.exhausted(scan_id, limit),
                _ = ticker.tick() => {}
            }

            if let Err(limit) = guard.admit() {
                return self.exhausted(scan_id, limit);
            }

            debug!(scan_id, tick = guard.ticks(), "Polling scan status");

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(scan_id, guard),
                limit = guard.expired() => return self.exhausted(scan_id, limit),
                result = self.repository.fetch_status(scan_id) => result,
            };

            if cancel.is_cancelled() {
                return self.cancelled(scan_id, guard);
            }

            match result {
                Ok(status) => {
                    on_status(&status);
                    if status.is_terminal() {
                        info!(
                            scan_id,
                            state = %status.status,
                            ticks = guard.ticks(),
                            "Scan reached terminal state"
                        );
                        return TrackOutcome::Terminal(status);
                    }
                }
                Err(e) => {
                    warn!(scan_id, tick = guard.ticks(), "Status poll failed: {:#}", e);
                }
            }
        }
    }

    fn cancelled(&self, scan_id: &str, guard: &PollGuard) -> TrackOutcome {
        info!(scan_id, ticks = guard.ticks(), "Status tracking cancelled");
        TrackOutcome::Cancelled
    }

    fn exhausted(&self, scan_id: &str, limit: GuardLimit) -> TrackOutcome {
        warn!(scan_id, %limit, "Scan did not reach a terminal state in time");
        TrackOutcome::Exhausted(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRepository;
    use pretty_assertions::assert_eq;
    use sitescan_core::domain::job::JobState;

    const INTERVAL: Duration = Duration::from_millis(2000);

    fn tracker(repo: &Arc<ScriptedRepository>) -> JobStatusTracker {
        JobStatusTracker::new(repo.clone(), INTERVAL)
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_first_completed() {
        let repo = Arc::new(ScriptedRepository::with_states([
            JobState::Pending,
            JobState::Processing,
            JobState::Completed,
        ]));
        let mut seen = Vec::new();
        let start = Instant::now();

        let outcome = tracker(&repo)
            .observe(
                "scan-1",
                &mut PollGuard::unbounded(),
                &CancellationToken::new(),
                |s| seen.push(s.status),
            )
            .await;

        assert_eq!(outcome, TrackOutcome::Terminal(JobStatus::new(JobState::Completed)));
        assert_eq!(
            seen,
            vec![JobState::Pending, JobState::Processing, JobState::Completed]
        );
        assert_eq!(start.elapsed(), INTERVAL * 2);

        time::sleep(INTERVAL * 5).await;
        assert_eq!(repo.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_error() {
        let repo = Arc::new(ScriptedRepository::with_states([
            JobState::Processing,
            JobState::Error,
            JobState::Processing,
        ]));

        let outcome = tracker(&repo)
            .observe(
                "scan-1",
                &mut PollGuard::unbounded(),
                &CancellationToken::new(),
                |_| {},
            )
            .await;

        assert_eq!(outcome, TrackOutcome::Terminal(JobStatus::new(JobState::Error)));
        assert_eq!(repo.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_does_not_end_tracking() {
        let repo = Arc::new(ScriptedRepository::new(
            vec![
                Err("connection refused".to_string()),
                Ok(JobState::Processing),
                Err("502 Bad Gateway".to_string()),
                Ok(JobState::Completed),
            ],
            vec![],
        ));
        let mut seen = 0;

        let outcome = tracker(&repo)
            .observe(
                "scan-1",
                &mut PollGuard::unbounded(),
                &CancellationToken::new(),
                |_| seen += 1,
            )
            .await;

        assert!(matches!(outcome, TrackOutcome::Terminal(_)));
        assert_eq!(repo.status_calls(), 4);
        assert_eq!(seen, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_after_two_ticks_stops_all_requests() {
        let cancel = CancellationToken::new();
        let repo = Arc::new(
            ScriptedRepository::with_states([JobState::Processing])
                .cancel_on_status_call(2, cancel.clone()),
        );
        let mut seen = 0;

        let outcome = tracker(&repo)
            .observe("scan-1", &mut PollGuard::unbounded(), &cancel, |_| seen += 1)
            .await;

        assert_eq!(outcome, TrackOutcome::Cancelled);
        assert_eq!(repo.status_calls(), 2);
        // The second response arrived after cancellation and was discarded.
        assert_eq!(seen, 1);

        time::sleep(INTERVAL * 5).await;
        assert_eq!(repo.status_calls(), 2);
        assert_eq!(repo.result_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_before_next_tick_prevents_it() {
        let cancel = CancellationToken::new();
        let repo = Arc::new(ScriptedRepository::with_states([JobState::Processing]));
        let tracker = tracker(&repo);

        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                time::sleep(INTERVAL + INTERVAL / 2).await;
                cancel.cancel();
            })
        };

        let outcome = tracker
            .observe("scan-1", &mut PollGuard::unbounded(), &cancel, |_| {})
            .await;
        canceller.await.unwrap();

        assert_eq!(outcome, TrackOutcome::Cancelled);
        assert_eq!(repo.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_guard_exhausts() {
        let repo = Arc::new(ScriptedRepository::with_states([JobState::Processing]));
        let mut guard = PollGuard::new(Some(3), None);

        let outcome = tracker(&repo)
            .observe("scan-1", &mut guard, &CancellationToken::new(), |_| {})
            .await;

        assert_eq!(outcome, TrackOutcome::Exhausted(GuardLimit::Ticks(3)));
        assert_eq!(repo.status_calls(), 3);
        assert_eq!(guard.ticks(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn duration_guard_exhausts() {
        let repo = Arc::new(ScriptedRepository::with_states([JobState::Pending]));
        let mut guard = PollGuard::new(None, Some(Duration::from_secs(5)));

        let outcome = tracker(&repo)
            .observe("scan-1", &mut guard, &CancellationToken::new(), |_| {})
            .await;

        assert_eq!(
            outcome,
            TrackOutcome::Exhausted(GuardLimit::Duration(Duration::from_secs(5)))
        );
        // Polls at 0s, 2s and 4s; the deadline hits before the 6s tick.
        assert_eq!(repo.status_calls(), 3);
    }

    #[test]
    fn guard_limit_display() {
        assert_eq!(GuardLimit::Ticks(30).to_string(), "30 status polls");
        assert_eq!(GuardLimit::Duration(Duration::from_secs(90)).to_string(), "90s");
    }
}
