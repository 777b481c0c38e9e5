use std::sync::Arc;

use axum::{
    extract::{Path, State as AxumState},
    response::{IntoResponse, Response},
    Extension, Json,
};
use foldify_core::{
    form::{keys, FormState},
    tool::Tool,
};
use foldify_submit::{FormController, SubmitOutcome};
use foldify_validation::{validate, validate_attachments};
use serde_json::Value;
use tracing::info;

use crate::{
    dto::{MessageDto, MultiFoldDto, ValidationDto},
    error::AppError,
    inflight::submission_key,
    session::SessionToken,
    state::State,
};

fn tool_from_path(key: &str) -> Result<Tool, AppError> {
    Tool::from_key(key).ok_or_else(|| AppError::UnknownTool(key.to_string()))
}

/// The posted form, read as the path's tool whatever `tool` the body names
fn form_for(tool: &str, body: Value) -> Result<FormState, AppError> {
    let tool = tool_from_path(tool)?;
    let Value::Object(mut fields) = body else {
        return Err(AppError::BadForm("expected a JSON object".to_string()));
    };
    fields.insert("tool".to_string(), Value::from(tool.key()));
    serde_json::from_value(Value::Object(fields)).map_err(|e| AppError::BadForm(e.to_string()))
}

pub async fn new_form(Path(tool): Path<String>) -> Result<Json<FormState>, AppError> {
    Ok(Json(FormState::new(tool_from_path(&tool)?)))
}

pub async fn validate_form(
    Path(tool): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ValidationDto>, AppError> {
    let form = form_for(&tool, body)?;
    Ok(Json(ValidationDto {
        form: validate(&form),
        files: validate_attachments(&form),
    }))
}

pub async fn submit_form(
    AxumState(state): AxumState<Arc<State>>,
    session: Option<Extension<SessionToken>>,
    Path(tool): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let form = form_for(&tool, body)?;
    let token = session.as_ref().map(|Extension(token)| token);

    // held until the backend has answered
    let key = submission_key(token, form.tool, form.text(keys::JOB_NAME));
    let _claim = state.submissions.claim(key).ok_or(AppError::Busy)?;

    let backend = state.backend_for(token);
    let controller = FormController::new(Arc::new(backend), form);

    match controller.submit().await? {
        SubmitOutcome::Single(outcome) => {
            let message = outcome?;
            info!("{} job accepted: {}", tool, message);
            Ok(Json(MessageDto { message }).into_response())
        }
        SubmitOutcome::MultiFold(report) => Ok(Json(MultiFoldDto::from(report)).into_response()),
    }
}
