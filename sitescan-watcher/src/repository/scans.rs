//! Scans repository
//!
//! Handles the two read operations a job-viewing session performs:
//! - Reading the job status
//! - Reading the result body

use anyhow::{Context, Result};
use async_trait::async_trait;
use sitescan_client::{ClientError, ResultsResponse, ScanClient};
use sitescan_core::domain::job::JobStatus;
use sitescan_core::domain::view::{FetchOutcome, TransportFailure};

/// Repository trait for the scan read endpoints
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// Fetches the current status record of a scan
    ///
    /// An error is a transport failure; it never means the job failed.
    ///
    /// # Arguments
    /// * `scan_id` - The scan to query
    async fn fetch_status(&self, scan_id: &str) -> Result<JobStatus>;

    /// Fetches the result body of a scan
    ///
    /// Transport failures are folded into [`FetchOutcome::Transport`] so the
    /// caller can still build an error descriptor from them.
    ///
    /// # Arguments
    /// * `scan_id` - The scan to query
    async fn fetch_results(&self, scan_id: &str) -> FetchOutcome;
}

/// HTTP implementation of ScanRepository
#[derive(Debug, Clone)]
pub struct HttpScanRepository {
    client: ScanClient,
}

impl HttpScanRepository {
    /// Creates a new HTTP scan repository
    ///
    /// # Arguments
    /// * `client` - Client bound to the backend base URL
    pub fn new(client: ScanClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScanRepository for HttpScanRepository {
    async fn fetch_status(&self, scan_id: &str) -> Result<JobStatus> {
        self.client
            .get_status(scan_id)
            .await
            .with_context(|| format!("Failed to fetch status of scan {}", scan_id))
    }

    async fn fetch_results(&self, scan_id: &str) -> FetchOutcome {
        match self.client.get_results(scan_id).await {
            Ok(ResultsResponse::Ready(body)) => FetchOutcome::Body(body),
            Ok(ResultsResponse::NotReady) => FetchOutcome::NotReady,
            Err(e) => FetchOutcome::Transport(transport_failure(&e)),
        }
    }
}

fn transport_failure(err: &ClientError) -> TransportFailure {
    TransportFailure {
        status: err.status(),
        message: Some(err.to_string()),
        body: err.body().cloned(),
    }
}
