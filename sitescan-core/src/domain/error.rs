//! Error descriptors
//!
//! Every way a scan can end badly (backend-reported failure, transport
//! failure, exhausted watch budget) is folded into one [`ErrorDescriptor`]
//! whose message is never empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when no upstream field carries a usable message
pub const GENERIC_ERROR_MESSAGE: &str =
    "Unknown error occurred. Check backend terminal for details.";

/// Kind used when neither the backend nor the transport names one
pub const UNKNOWN_ERROR_KIND: &str = "UnknownError";

/// Kind used when the result request itself failed
pub const FETCH_ERROR_KIND: &str = "FetchError";

/// Kind used when the watch guard gives up on a job
pub const TIMEOUT_ERROR_KIND: &str = "Timeout";

/// Kind used when a session is refused before any request is sent
pub const INVALID_REQUEST_KIND: &str = "InvalidRequest";

/// Diagnostic body the backend attaches to a failed scan
///
/// Served by the result endpoint when the job ended in `error`, and by any
/// non-success response that carries a JSON body. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorReport {
    pub error: Option<String>,
    pub detail: Option<String>,
    pub error_type: Option<String>,
    pub traceback: Option<String>,
}

impl ErrorReport {
    /// Reads the diagnostic fields out of an arbitrary JSON body
    ///
    /// Non-string fields are ignored rather than failing the whole body.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            error: field("error"),
            detail: field("detail"),
            error_type: field("error_type"),
            traceback: field("traceback"),
        }
    }

    /// The backend's own message, if it sent a non-blank one
    pub fn message(&self) -> Option<&str> {
        non_blank(self.error.as_deref()).or_else(|| non_blank(self.detail.as_deref()))
    }

    pub fn kind(&self) -> Option<&str> {
        non_blank(self.error_type.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.message().is_none() && self.kind().is_none() && self.traceback.is_none()
    }
}

/// Normalized failure shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Human-readable message; never empty
    pub message: String,
    pub kind: String,
    /// Technical detail (backend traceback), shown behind a disclosure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorDescriptor {
    /// Resolves a descriptor from whatever the backend and transport provided
    ///
    /// Message precedence, in order:
    /// 1. the report's own message (`error`, then `detail`)
    /// 2. the transport failure's message
    /// 3. `An error occurred (Type: X)` when only a kind is known
    /// 4. [`GENERIC_ERROR_MESSAGE`]
    ///
    /// `transport_failed` marks that the result request itself failed, which
    /// selects [`FETCH_ERROR_KIND`] when the report names no kind.
    pub fn resolve(
        report: Option<&ErrorReport>,
        transport_message: Option<&str>,
        transport_failed: bool,
    ) -> Self {
        let report_kind = report.and_then(ErrorReport::kind);

        let message = if let Some(msg) = report.and_then(ErrorReport::message) {
            msg.to_string()
        } else if let Some(msg) = non_blank(transport_message) {
            msg.to_string()
        } else if let Some(kind) = report_kind {
            format!(
                "An error occurred (Type: {}). Check backend terminal for details.",
                kind
            )
        } else {
            GENERIC_ERROR_MESSAGE.to_string()
        };

        let kind = match report_kind {
            Some(kind) => kind.to_string(),
            None if transport_failed => FETCH_ERROR_KIND.to_string(),
            None => UNKNOWN_ERROR_KIND.to_string(),
        };

        Self {
            message,
            kind,
            detail: report
                .and_then(|r| non_blank(r.traceback.as_deref()))
                .map(str::to_string),
        }
    }

    /// Descriptor for a job the watch guard stopped waiting on
    pub fn timeout(reason: impl AsRef<str>) -> Self {
        Self {
            message: format!(
                "Scan did not finish within the allowed time ({})",
                reason.as_ref()
            ),
            kind: TIMEOUT_ERROR_KIND.to_string(),
            detail: None,
        }
    }

    /// Descriptor for a session that cannot be started at all
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            message: if reason.trim().is_empty() {
                GENERIC_ERROR_MESSAGE.to_string()
            } else {
                reason
            },
            kind: INVALID_REQUEST_KIND.to_string(),
            detail: None,
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
