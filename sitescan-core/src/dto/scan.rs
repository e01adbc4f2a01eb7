//! Scan submission DTOs

use serde::{Deserialize, Serialize};

/// Page budget applied when the caller does not choose one
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Request to start a new website scan (`POST /scan`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub url: String,
    pub max_pages: u32,
    pub include_external: bool,
}

impl ScanRequest {
    /// Creates a request with the default page budget and internal links only
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_pages: DEFAULT_MAX_PAGES,
            include_external: false,
        }
    }

    /// Checks the request before it is sent
    ///
    /// The backend only crawls absolute http(s) URLs and needs a non-zero
    /// page budget.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err("url cannot be empty".to_string());
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!(
                "Invalid URL format: {}. URL must start with http:// or https://",
                url
            ));
        }
        if self.max_pages == 0 {
            return Err("max_pages must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Backend acknowledgement of a submitted scan
///
/// `scan_id` is the opaque identifier the watcher polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub scan_id: String,
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Health probe answer (`GET /health`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}
