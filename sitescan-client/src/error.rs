//! Error types for the Sitescan client

use serde_json::Value;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Sitescan client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
        /// JSON body of the failure response, if it had one
        body: Option<Value>,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and raw response text
    ///
    /// When the text is JSON the body is kept and its `detail` (FastAPI's
    /// error field) becomes the message.
    pub fn api_error(status: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        let body = serde_json::from_str::<Value>(&text).ok();
        let message = body
            .as_ref()
            .and_then(|b| b.get("detail"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(text);

        if status == 404 {
            return Self::NotFound(message);
        }

        Self::ApiError {
            status,
            message,
            body,
        }
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// JSON body of the failure response, if any
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::ApiError { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_extracts_detail() {
        let err = ClientError::api_error(500, r#"{"detail":"boom","error_type":"RuntimeError"}"#);
        match &err {
            ClientError::ApiError { status, message, body } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "boom");
                assert_eq!(body.as_ref().unwrap()["error_type"], "RuntimeError");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_api_error_plain_text() {
        let err = ClientError::api_error(502, "Bad Gateway");
        assert!(err.body().is_none());
        assert_eq!(err.to_string(), "API error (status 502): Bad Gateway");
    }

    #[test]
    fn test_not_found_mapping() {
        let err = ClientError::api_error(404, r#"{"detail":"Scan not found"}"#);
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Resource not found: Scan not found");
    }
}
