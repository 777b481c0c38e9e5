use foldify_core::form::FormState;
use foldify_payload::multifold::plan;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::BackendClient;

/// Outcome of one tool's submission inside a MultiFold batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiFoldReport {
    pub results: Vec<ToolResult>,
}

impl MultiFoldReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ToolResult> {
        self.results.iter().filter(|r| r.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ToolResult> {
        self.results.iter().filter(|r| !r.success)
    }

    /// Empty when nothing went through
    pub fn success_message(&self) -> String {
        let tools: Vec<&str> = self.succeeded().map(|r| r.tool.as_str()).collect();
        if tools.is_empty() {
            return String::new();
        }
        format!("Successfully submitted jobs for: {}", tools.join(", "))
    }

    /// Empty when every submission went through
    pub fn error_message(&self) -> String {
        let failures: Vec<String> = self
            .failed()
            .map(|r| format!("{}: {}", r.tool, r.error.as_deref().unwrap_or_default()))
            .collect();
        if failures.is_empty() {
            return String::new();
        }
        format!("Failed to submit jobs for: {}", failures.join("; "))
    }
}

/// Submit every selected tool at once and wait for all of them.
///
/// One failure does not cancel the others and nothing is retried. Unknown
/// tool keys fail without a request being made.
pub async fn submit_multifold<C>(client: &C, form: &FormState) -> MultiFoldReport
where
    C: BackendClient + ?Sized,
{
    let submissions = plan(form).into_iter().map(|(key, planned)| async move {
        let payload = match planned {
            Ok(payload) => payload,
            Err(err) => return ToolResult::failure(key, err.to_string()),
        };
        let tool = payload.tool.display_name();
        match client.submit(payload.endpoint, &payload.body).await {
            Ok(message) => ToolResult::success(tool, message),
            Err(err) => {
                warn!("MultiFold submission to {} failed: {}", tool, err);
                ToolResult::failure(tool, err.to_string())
            }
        }
    });

    let report = MultiFoldReport {
        results: join_all(submissions).await,
    };
    info!(
        "MultiFold batch done: {} submitted, {} failed",
        report.succeeded().count(),
        report.failed().count()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_messages() {
        let report = MultiFoldReport {
            results: vec![
                ToolResult::success("ColabFold", "queued"),
                ToolResult::failure("AlphaFold2", "Job already exists"),
                ToolResult::success("ESMFold", "queued"),
                ToolResult::failure("foo", "Unknown tool: foo"),
            ],
        };
        assert_eq!(
            report.success_message(),
            "Successfully submitted jobs for: ColabFold, ESMFold"
        );
        assert_eq!(
            report.error_message(),
            "Failed to submit jobs for: AlphaFold2: Job already exists; foo: Unknown tool: foo"
        );
    }

    #[test]
    fn test_empty_messages() {
        let report = MultiFoldReport {
            results: vec![ToolResult::success("ESMFold", "queued")],
        };
        assert_eq!(report.error_message(), "");

        let report = MultiFoldReport {
            results: vec![ToolResult::failure("ESMFold", "down")],
        };
        assert_eq!(report.success_message(), "");
    }
}
