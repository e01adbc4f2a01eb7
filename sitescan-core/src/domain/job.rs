//! Job lifecycle types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a backend scan job
///
/// Owned by the backend; the client only ever observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Error,
}

impl JobState {
    /// Whether no further transitions are possible
    ///
    /// Polling stops on the first terminal observation.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status record returned by `GET /scan/{id}/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_id: Option<String>,
    pub status: JobState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JobStatus {
    pub fn new(status: JobState) -> Self {
        Self {
            scan_id: None,
            status,
            message: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Processing.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Error.is_terminal());
    }

    #[test]
    fn test_status_wire_format() {
        let status: JobStatus =
            serde_json::from_str(r#"{"scan_id":"s-1","status":"processing"}"#).unwrap();
        assert_eq!(status.status, JobState::Processing);
        assert_eq!(status.scan_id.as_deref(), Some("s-1"));
        assert!(status.message.is_none());

        let status: JobStatus =
            serde_json::from_str(r#"{"status":"error","message":"crawl failed"}"#).unwrap();
        assert_eq!(status.status, JobState::Error);
        assert_eq!(status.message.as_deref(), Some("crawl failed"));
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        assert!(serde_json::from_str::<JobStatus>(r#"{"status":"paused"}"#).is_err());
    }
}
