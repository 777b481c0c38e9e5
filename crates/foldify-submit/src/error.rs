use foldify_payload::PayloadError;
use foldify_validation::ValidationResult;
use thiserror::Error;

/// Why a request to the backend did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("No response received from the server.")]
    NoResponse,

    /// Non-2xx answer; `message` is the body's `error` field or the raw body
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("An error occurred: {0}")]
    Request(String),
}

impl SubmitError {
    /// Interpret the body of a failed response
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.to_string());
        SubmitError::Backend { status, message }
    }
}

/// Why the controller refused to start a submission
#[derive(Debug, Error)]
pub enum SubmitRejected {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("the form has validation errors")]
    Invalid(ValidationResult),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}
