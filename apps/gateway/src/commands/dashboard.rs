//! Job management, relayed to the backend on behalf of the session.

use std::sync::Arc;

use axum::{
    extract::{Path, State as AxumState},
    Extension, Json,
};
use foldify_submit::{DashboardClient, JobList, ZipAvailability};

use crate::{
    dto::{DeleteJobsDto, MessageDto},
    error::AppError,
    session::SessionToken,
    state::State,
};

type Session = Option<Extension<SessionToken>>;

fn token(session: &Session) -> Option<&SessionToken> {
    session.as_ref().map(|Extension(token)| token)
}

pub async fn list_jobs(
    AxumState(state): AxumState<Arc<State>>,
    session: Session,
    Path(scope): Path<String>,
) -> Result<Json<JobList>, AppError> {
    let backend = state.backend_for(token(&session));
    let jobs = match scope.as_str() {
        "user" => backend.user_jobs().await?,
        "public" => backend.public_jobs().await?,
        "running" => backend.running_jobs().await?,
        other => return Err(AppError::UnknownScope(other.to_string())),
    };
    Ok(Json(jobs))
}

pub async fn delete_job(
    AxumState(state): AxumState<Arc<State>>,
    session: Session,
    Path(job_name): Path<String>,
) -> Result<Json<MessageDto>, AppError> {
    let message = state.backend_for(token(&session)).delete_job(&job_name).await?;
    Ok(Json(MessageDto { message }))
}

pub async fn delete_jobs(
    AxumState(state): AxumState<Arc<State>>,
    session: Session,
    Json(body): Json<DeleteJobsDto>,
) -> Result<Json<MessageDto>, AppError> {
    let message = state
        .backend_for(token(&session))
        .delete_jobs(&body.job_names)
        .await?;
    Ok(Json(MessageDto { message }))
}

pub async fn switch_publicity(
    AxumState(state): AxumState<Arc<State>>,
    session: Session,
    Path(job_name): Path<String>,
) -> Result<Json<MessageDto>, AppError> {
    let message = state
        .backend_for(token(&session))
        .switch_publicity(&job_name)
        .await?;
    Ok(Json(MessageDto { message }))
}

pub async fn zip_available(
    AxumState(state): AxumState<Arc<State>>,
    session: Session,
    Path(job_name): Path<String>,
) -> Result<Json<ZipAvailability>, AppError> {
    let availability = state
        .backend_for(token(&session))
        .zip_available(&job_name)
        .await?;
    Ok(Json(availability))
}
