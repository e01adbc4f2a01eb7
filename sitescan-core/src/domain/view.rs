//! Render-ready view model and the settle transition
//!
//! A job-viewing session ends in exactly one of three shapes. Renderers only
//! ever see [`ResultViewModel`]; raw transport states never leak past
//! [`settle`].

use serde::Serialize;
use serde_json::Value;

use crate::domain::error::{ErrorDescriptor, ErrorReport};
use crate::domain::job::JobState;
use crate::domain::payload::ResultPayload;

/// What came back from one result request
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Success status with a JSON body
    Body(Value),
    /// The backend has not persisted the result yet (HTTP 202)
    NotReady,
    /// The request failed or returned a failure status
    Transport(TransportFailure),
}

/// A failed result request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportFailure {
    /// HTTP status, when a response was received at all
    pub status: Option<u16>,
    pub message: Option<String>,
    /// JSON body of a failure response, kept as diagnostic detail
    pub body: Option<Value>,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn report(&self) -> Option<ErrorReport> {
        self.body.as_ref().map(ErrorReport::from_value)
    }
}

/// The only shape rendering collaborators depend on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum ResultViewModel {
    Pending,
    Ready(Box<ResultPayload>),
    Failed(ErrorDescriptor),
}

impl ResultViewModel {
    /// Whether the model is final for its job
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn payload(&self) -> Option<&ResultPayload> {
        match self {
            Self::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        match self {
            Self::Failed(desc) => Some(desc),
            _ => None,
        }
    }
}

/// Total transition from (last known job state, fetch outcome) to a view model
///
/// | state                | outcome   | model                                  |
/// |----------------------|-----------|----------------------------------------|
/// | pending / processing | any       | `Pending` (result not meaningful yet)  |
/// | completed / error    | NotReady  | `Pending` (status/result race)         |
/// | completed            | Body      | `Ready`, sections decoded leniently    |
/// | error                | Body      | `Failed` from the diagnostic body      |
/// | completed / error    | Transport | `Failed` from body + transport message |
pub fn settle(state: JobState, outcome: FetchOutcome) -> ResultViewModel {
    match (state, outcome) {
        (JobState::Pending | JobState::Processing, _) => ResultViewModel::Pending,
        (JobState::Completed | JobState::Error, FetchOutcome::NotReady) => ResultViewModel::Pending,
        (JobState::Completed, FetchOutcome::Body(body)) => {
            ResultViewModel::Ready(Box::new(ResultPayload::from_value(body)))
        }
        (JobState::Error, FetchOutcome::Body(body)) => {
            let report = ErrorReport::from_value(&body);
            ResultViewModel::Failed(ErrorDescriptor::resolve(Some(&report), None, false))
        }
        (JobState::Completed | JobState::Error, FetchOutcome::Transport(failure)) => {
            let report = failure.report();
            ResultViewModel::Failed(ErrorDescriptor::resolve(
                report.as_ref(),
                failure.message.as_deref(),
                true,
            ))
        }
    }
}
