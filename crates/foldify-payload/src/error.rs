use foldify_core::tool::Tool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid model seed: {0}")]
    InvalidModelSeed(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0} has no submission endpoint of its own")]
    NoEndpoint(Tool),

    #[error("Missing attachment: {0}")]
    MissingAttachment(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
