//! Scan-related API endpoints

use reqwest::StatusCode;
use serde_json::Value;
use sitescan_core::domain::job::JobStatus;
use sitescan_core::dto::scan::{HealthStatus, ScanRequest, ScanResponse};
use tracing::debug;

use crate::ScanClient;
use crate::error::{ClientError, Result};

/// Answer of the result endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsResponse {
    /// Success status with a JSON body (result payload, or diagnostics for a failed job)
    Ready(Value),
    /// HTTP 202: the job is terminal but its result is not stored yet
    NotReady,
}

impl ScanClient {
    // =============================================================================
    // Scan Lifecycle
    // =============================================================================

    /// Submit a new website scan
    ///
    /// # Arguments
    /// * `req` - The scan request
    ///
    /// # Returns
    /// The backend acknowledgement carrying the `scan_id` to poll
    ///
    /// # Example
    /// ```no_run
    /// # use sitescan_client::ScanClient;
    /// # use sitescan_core::dto::scan::ScanRequest;
    /// # async fn example() -> sitescan_client::Result<()> {
    /// let client = ScanClient::new("http://localhost:8000/api");
    /// let ack = client.submit_scan(&ScanRequest::new("https://example.com")).await?;
    /// println!("Started scan {}", ack.scan_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_scan(&self, req: &ScanRequest) -> Result<ScanResponse> {
        req.validate().map_err(ClientError::InvalidRequest)?;

        let url = format!("{}/scan", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get the current status of a scan
    ///
    /// # Arguments
    /// * `scan_id` - The scan identifier returned by [`ScanClient::submit_scan`]
    pub async fn get_status(&self, scan_id: &str) -> Result<JobStatus> {
        let url = self.scan_url(scan_id, "status")?;
        debug!(scan_id, "GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the result body of a scan
    ///
    /// A 202 answer is reported as [`ResultsResponse::NotReady`], not as an
    /// error. Any other non-success status is an [`ClientError::ApiError`]
    /// that keeps the JSON body for diagnostics.
    ///
    /// # Arguments
    /// * `scan_id` - The scan identifier
    pub async fn get_results(&self, scan_id: &str) -> Result<ResultsResponse> {
        let url = self.scan_url(scan_id, "results")?;
        debug!(scan_id, "GET {}", url);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::ACCEPTED {
            return Ok(ResultsResponse::NotReady);
        }

        self.handle_response(response).await.map(ResultsResponse::Ready)
    }

    // =============================================================================
    // Health
    // =============================================================================

    /// Probe the backend health endpoint
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    pub(crate) fn scan_url(&self, scan_id: &str, leaf: &str) -> Result<String> {
        let scan_id = scan_id.trim();
        if scan_id.is_empty() {
            return Err(ClientError::InvalidRequest(
                "scan id cannot be empty".to_string(),
            ));
        }
        Ok(format!("{}/scan/{}/{}", self.base_url, scan_id, leaf))
    }
}
