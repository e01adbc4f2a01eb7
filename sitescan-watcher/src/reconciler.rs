//! Result reconciler
//!
//! Fetches the result body of a terminal scan and turns it into a
//! [`ResultViewModel`]. Settled models are remembered per scan id, so asking
//! again never issues a second request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sitescan_core::domain::job::JobState;
use sitescan_core::domain::view::{ResultViewModel, settle};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::repository::ScanRepository;

/// Settled models live as long as the reconciler; one reconciler is meant to
/// serve the handful of scans a single front-end session looks at.
pub struct ResultReconciler {
    repository: Arc<dyn ScanRepository>,
    settled: Mutex<HashMap<String, ResultViewModel>>,
    /// Held across a result fetch so concurrent callers never fetch twice
    fetching: AsyncMutex<()>,
}

impl ResultReconciler {
    pub fn new(repository: Arc<dyn ScanRepository>) -> Self {
        Self {
            repository,
            settled: Mutex::new(HashMap::new()),
            fetching: AsyncMutex::new(()),
        }
    }

    /// Fetches and normalizes the result of `scan_id`
    ///
    /// Must only be called once the job was observed in a terminal state;
    /// with a non-terminal `last_known` it returns `Pending` without touching
    /// the network. A `Pending` answer from a terminal job (the result is not
    /// stored yet) is not remembered, so the next call fetches again.
    ///
    /// Fetches are serialized: a caller that waited on another caller's fetch
    /// for the same scan gets the model that fetch settled.
    pub async fn fetch_and_normalize(&self, scan_id: &str, last_known: JobState) -> ResultViewModel {
        if let Some(model) = self.settled_model(scan_id) {
            debug!(scan_id, "Returning settled result");
            return model;
        }

        if !last_known.is_terminal() {
            warn!(scan_id, state = %last_known, "Result requested before the scan finished");
            return ResultViewModel::Pending;
        }

        let _fetching = self.fetching.lock().await;
        if let Some(model) = self.settled_model(scan_id) {
            debug!(scan_id, "Result settled by a concurrent fetch");
            return model;
        }

        let outcome = self.repository.fetch_results(scan_id).await;
        let model = settle(last_known, outcome);

        match &model {
            ResultViewModel::Pending => {
                info!(scan_id, state = %last_known, "Scan is terminal but its result is not ready yet");
            }
            ResultViewModel::Ready(payload) => {
                info!(
                    scan_id,
                    sections = payload.present_sections().len(),
                    "Scan result ready"
                );
            }
            ResultViewModel::Failed(error) => {
                warn!(scan_id, kind = %error.kind, "Scan failed: {}", error.message);
            }
        }

        if model.is_settled() {
            self.settled
                .lock()
                .unwrap()
                .insert(scan_id.to_string(), model.clone());
        }
        model
    }

    /// The settled model of `scan_id`, if one was produced
    pub fn settled_model(&self, scan_id: &str) -> Option<ResultViewModel> {
        self.settled.lock().unwrap().get(scan_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRepository;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sitescan_core::domain::error::{ErrorDescriptor, GENERIC_ERROR_MESSAGE};
    use sitescan_core::domain::view::{FetchOutcome, TransportFailure};

    fn reconciler(results: Vec<FetchOutcome>) -> (Arc<ScriptedRepository>, ResultReconciler) {
        let repo = Arc::new(ScriptedRepository::new(Vec::new(), results));
        let reconciler = ResultReconciler::new(repo.clone());
        (repo, reconciler)
    }

    #[tokio::test]
    async fn completed_body_is_ready_and_fetched_once() {
        let (repo, reconciler) = reconciler(vec![FetchOutcome::Body(json!({
            "scan_id": "scan-1",
            "seo_audit": {"score": 91.0}
        }))]);

        let first = reconciler.fetch_and_normalize("scan-1", JobState::Completed).await;
        let second = reconciler.fetch_and_normalize("scan-1", JobState::Completed).await;

        assert_eq!(first, second);
        assert_eq!(repo.result_calls(), 1);
        let payload = first.payload().unwrap();
        assert_eq!(payload.seo_audit.as_ref().unwrap().score, 91.0);
        assert!(payload.duplicates.is_none());
    }

    #[tokio::test]
    async fn error_with_detail_body() {
        let (_, reconciler) = reconciler(vec![FetchOutcome::Body(json!({
            "detail": "Blocked by robots.txt"
        }))]);

        let model = reconciler.fetch_and_normalize("scan-1", JobState::Error).await;

        assert_eq!(
            model,
            ResultViewModel::Failed(ErrorDescriptor {
                message: "Blocked by robots.txt".to_string(),
                kind: "UnknownError".to_string(),
                detail: None,
            })
        );
    }

    #[tokio::test]
    async fn error_with_silent_transport_failure_uses_generic_message() {
        let (_, reconciler) =
            reconciler(vec![FetchOutcome::Transport(TransportFailure::default())]);

        let model = reconciler.fetch_and_normalize("scan-1", JobState::Error).await;

        assert_eq!(model.error().unwrap().message, GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn failed_model_is_remembered() {
        let (repo, reconciler) = reconciler(vec![FetchOutcome::Body(json!({
            "error": "Failed to crawl website: timeout",
            "error_type": "Exception"
        }))]);

        let first = reconciler.fetch_and_normalize("scan-1", JobState::Error).await;
        let second = reconciler.fetch_and_normalize("scan-1", JobState::Error).await;

        assert_eq!(first, second);
        assert_eq!(repo.result_calls(), 1);
        assert_eq!(reconciler.settled_model("scan-1"), Some(first));
    }

    #[tokio::test]
    async fn not_ready_is_pending_and_not_remembered() {
        let (repo, reconciler) = reconciler(vec![
            FetchOutcome::NotReady,
            FetchOutcome::Body(json!({})),
        ]);

        let first = reconciler.fetch_and_normalize("scan-1", JobState::Completed).await;
        assert_eq!(first, ResultViewModel::Pending);
        assert!(reconciler.settled_model("scan-1").is_none());

        let second = reconciler.fetch_and_normalize("scan-1", JobState::Completed).await;
        assert!(second.payload().is_some());
        assert_eq!(repo.result_calls(), 2);
    }

    #[tokio::test]
    async fn non_terminal_state_skips_the_request() {
        let (repo, reconciler) = reconciler(vec![FetchOutcome::Body(json!({}))]);

        let model = reconciler.fetch_and_normalize("scan-1", JobState::Processing).await;

        assert_eq!(model, ResultViewModel::Pending);
        assert_eq!(repo.result_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_fetch() {
        let repo = Arc::new(
            ScriptedRepository::new(Vec::new(), vec![FetchOutcome::Body(json!({}))])
                .with_result_delay(std::time::Duration::from_secs(1)),
        );
        let reconciler = ResultReconciler::new(repo.clone());

        let (first, second) = tokio::join!(
            reconciler.fetch_and_normalize("scan-1", JobState::Completed),
            reconciler.fetch_and_normalize("scan-1", JobState::Completed),
        );

        assert_eq!(first, second);
        assert!(first.payload().is_some());
        assert_eq!(repo.result_calls(), 1);
    }

    #[tokio::test]
    async fn sessions_are_keyed_by_scan_id() {
        let (repo, reconciler) = reconciler(vec![FetchOutcome::Body(json!({}))]);

        reconciler.fetch_and_normalize("scan-1", JobState::Completed).await;
        reconciler.fetch_and_normalize("scan-2", JobState::Completed).await;

        assert_eq!(repo.result_calls(), 2);
    }
}
