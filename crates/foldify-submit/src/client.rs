use async_trait::async_trait;
use foldify_payload::SubmissionBody;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SubmitError;

/// Anything that can accept job submissions
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// POST `body` to `endpoint`; the success value is the backend's `message`
    async fn submit(&self, endpoint: &str, body: &SubmissionBody) -> Result<String, SubmitError>;
}

/// Job listing as returned by the dashboard endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipAvailability {
    pub download: bool,
    #[serde(default)]
    pub username: String,
}

/// Job management calls made from the dashboard and result pages
#[async_trait]
pub trait DashboardClient: Send + Sync {
    async fn user_jobs(&self) -> Result<JobList, SubmitError>;
    async fn public_jobs(&self) -> Result<JobList, SubmitError>;
    async fn running_jobs(&self) -> Result<JobList, SubmitError>;
    async fn delete_job(&self, job_name: &str) -> Result<String, SubmitError>;
    async fn delete_jobs(&self, job_names: &[String]) -> Result<String, SubmitError>;
    async fn switch_publicity(&self, job_name: &str) -> Result<String, SubmitError>;
    async fn zip_available(&self, job_name: &str) -> Result<ZipAvailability, SubmitError>;
}
