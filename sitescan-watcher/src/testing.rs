//! Scripted in-memory backend for watcher tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sitescan_core::domain::job::{JobState, JobStatus};
use sitescan_core::domain::view::FetchOutcome;
use tokio_util::sync::CancellationToken;

use crate::repository::ScanRepository;

/// Replays scripted status and result answers
///
/// Once a script runs out, its last entry is repeated, so a single
/// `Processing` entry models a job that never finishes.
pub struct ScriptedRepository {
    statuses: Mutex<VecDeque<Result<JobState, String>>>,
    results: Mutex<VecDeque<FetchOutcome>>,
    status_calls: AtomicUsize,
    result_calls: AtomicUsize,
    cancel_on_status_call: Option<(usize, CancellationToken)>,
    result_delay: Option<Duration>,
    hang_results: bool,
}

impl ScriptedRepository {
    pub fn new(statuses: Vec<Result<JobState, String>>, results: Vec<FetchOutcome>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            results: Mutex::new(results.into()),
            status_calls: AtomicUsize::new(0),
            result_calls: AtomicUsize::new(0),
            cancel_on_status_call: None,
            result_delay: None,
            hang_results: false,
        }
    }

    pub fn with_states(states: impl IntoIterator<Item = JobState>) -> Self {
        Self::new(states.into_iter().map(Ok).collect(), Vec::new())
    }

    pub fn with_results(mut self, results: impl IntoIterator<Item = FetchOutcome>) -> Self {
        self.results = Mutex::new(results.into_iter().collect());
        self
    }

    /// Cancels `token` while serving the `call`-th status request (1-based)
    pub fn cancel_on_status_call(mut self, call: usize, token: CancellationToken) -> Self {
        self.cancel_on_status_call = Some((call, token));
        self
    }

    /// Delays every result answer by `delay`
    pub fn with_result_delay(mut self, delay: Duration) -> Self {
        self.result_delay = Some(delay);
        self
    }

    /// Result requests never answer
    pub fn hang_results(mut self) -> Self {
        self.hang_results = true;
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn result_calls(&self) -> usize {
        self.result_calls.load(Ordering::SeqCst)
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl ScanRepository for ScriptedRepository {
    async fn fetch_status(&self, _scan_id: &str) -> anyhow::Result<JobStatus> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((at, token)) = &self.cancel_on_status_call {
            if *at == call {
                token.cancel();
            }
        }

        match Self::next(&self.statuses) {
            Some(Ok(state)) => Ok(JobStatus::new(state)),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("no scripted status")),
        }
    }

    async fn fetch_results(&self, _scan_id: &str) -> FetchOutcome {
        self.result_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_results {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.result_delay {
            tokio::time::sleep(delay).await;
        }
        Self::next(&self.results).unwrap_or(FetchOutcome::NotReady)
    }
}
