//! Sitescan HTTP Client
//!
//! A small, type-safe HTTP client for the website-analysis backend.
//!
//! It covers the four backend operations the front-ends need: submitting a
//! scan, reading its status, reading its result body and probing health.
//! Interpreting status and result bodies is left to `sitescan-watcher`.
//!
//! # Example
//!
//! ```no_run
//! use sitescan_client::ScanClient;
//! use sitescan_core::dto::scan::ScanRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ScanClient::new("http://localhost:8000/api");
//!
//!     let ack = client.submit_scan(&ScanRequest::new("https://example.com")).await?;
//!     let status = client.get_status(&ack.scan_id).await?;
//!
//!     println!("Scan {} is {}", ack.scan_id, status.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod scans;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use scans::ResultsResponse;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the website-analysis backend
#[derive(Debug, Clone)]
pub struct ScanClient {
    /// Base URL of the API (e.g., "http://localhost:8000/api")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ScanClient {
    /// Create a new scan client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "http://localhost:8000/api")
    ///
    /// # Example
    /// ```
    /// use sitescan_client::ScanClient;
    ///
    /// let client = ScanClient::new("http://localhost:8000/api");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new scan client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use sitescan_client::ScanClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ScanClient::with_client("http://localhost:8000/api", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
