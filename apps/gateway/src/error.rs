use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use foldify_payload::PayloadError;
use foldify_submit::{SubmitError, SubmitRejected};
use foldify_validation::ValidationResult;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown job listing: {0}")]
    UnknownScope(String),

    #[error("Malformed form: {0}")]
    BadForm(String),

    #[error("Form has validation errors")]
    Invalid(ValidationResult),

    #[error("A submission for this form is already in progress")]
    Busy,

    #[error("Session could not be established")]
    Session,

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Backend(#[from] SubmitError),
}

impl From<SubmitRejected> for AppError {
    fn from(rejected: SubmitRejected) -> Self {
        match rejected {
            SubmitRejected::InFlight => AppError::Busy,
            SubmitRejected::Invalid(result) => AppError::Invalid(result),
            SubmitRejected::Payload(e) => AppError::Payload(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnknownTool { .. } | AppError::UnknownScope { .. } => StatusCode::NOT_FOUND,
            AppError::Invalid(result) => {
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(result)).into_response()
            }
            AppError::BadForm { .. } => StatusCode::BAD_REQUEST,
            AppError::Busy => StatusCode::CONFLICT,
            AppError::Session => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Payload { .. } => StatusCode::BAD_REQUEST,
            AppError::Backend { .. } => StatusCode::BAD_GATEWAY,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
