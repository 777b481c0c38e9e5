use foldify_core::form::Attachment;
use foldify_core::tool::Tool;
use serde::Serialize;
use serde_json::Value;

use crate::error::PayloadError;

/// A file sent alongside the multipart `data` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: &'static str,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FilePart {
    pub fn from_attachment(field: &'static str, attachment: &Attachment) -> Self {
        Self {
            field,
            file_name: attachment.file_name.clone(),
            content: attachment.content.clone().into_bytes(),
        }
    }
}

/// How the request body goes over the wire
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionBody {
    Json(Value),
    /// `data` is sent as a JSON string part named `data`
    Multipart { data: Value, files: Vec<FilePart> },
}

/// One ready-to-send job submission
#[derive(Debug, Clone, PartialEq)]
pub struct JobPayload {
    pub tool: Tool,
    pub endpoint: &'static str,
    pub job_name: String,
    pub body: SubmissionBody,
}

impl JobPayload {
    pub fn json<T: Serialize>(
        tool: Tool,
        endpoint: &'static str,
        job_name: impl Into<String>,
        record: &T,
    ) -> Result<Self, PayloadError> {
        Ok(Self {
            tool,
            endpoint,
            job_name: job_name.into(),
            body: SubmissionBody::Json(serde_json::to_value(record)?),
        })
    }

    pub fn multipart<T: Serialize>(
        tool: Tool,
        endpoint: &'static str,
        job_name: impl Into<String>,
        record: &T,
        files: Vec<FilePart>,
    ) -> Result<Self, PayloadError> {
        Ok(Self {
            tool,
            endpoint,
            job_name: job_name.into(),
            body: SubmissionBody::Multipart {
                data: serde_json::to_value(record)?,
                files,
            },
        })
    }

    /// The JSON document of the body, whichever encoding it uses
    pub fn data(&self) -> &Value {
        match &self.body {
            SubmissionBody::Json(value) => value,
            SubmissionBody::Multipart { data, .. } => data,
        }
    }
}
