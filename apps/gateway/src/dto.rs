//! Response bodies of the gateway routes.

use foldify_submit::{MultiFoldReport, ToolResult};
use foldify_validation::ValidationResult;
use serde::{Deserialize, Serialize};

/// Form validation plus the separate upload check
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDto {
    #[serde(flatten)]
    pub form: ValidationResult,
    pub files: ValidationResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiFoldDto {
    pub results: Vec<ToolResult>,
    pub success_message: String,
    pub error_message: String,
}

impl From<MultiFoldReport> for MultiFoldDto {
    fn from(report: MultiFoldReport) -> Self {
        Self {
            success_message: report.success_message(),
            error_message: report.error_message(),
            results: report.results,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteJobsDto {
    pub job_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub ok: bool,
    pub version: &'static str,
}
