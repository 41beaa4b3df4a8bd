//! Tool domain value objects: result and error types
//!
//! These types form the **output side** of the tool pipeline. A tool returns
//! a bare [`ToolResult`] (content, data, error, success); the executor then
//! attaches the execution summary, safety level and formatted duration as the
//! call moves through the pipeline.

use crate::safety::{ExecutionSummary, SafetyLevel};
use serde::{Deserialize, Serialize};

/// Error returned by a tool's `execute`.
///
/// | Code | Description |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Missing/wrong parameters |
/// | `NOT_FOUND` | Unknown tool or resource |
/// | `EXECUTION_FAILED` | Runtime failure (I/O error, non-zero exit) |
/// | `PERMISSION_DENIED` | Access denied |
/// | `TIMEOUT` | Operation timed out |
/// | `CANCELLED` | Caller cancelled the call |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "PERMISSION_DENIED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn permission_denied(resource: impl Into<String>) -> Self {
        Self::new(
            "PERMISSION_DENIED",
            format!("Permission denied: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }

    pub fn cancelled() -> Self {
        Self::new("CANCELLED", "cancelled")
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Outcome envelope of one tool execution.
///
/// `content`/`data`/`error`/`success` are produced by the tool itself;
/// `execution_summary`, `safety_level` and `duration` are attached by the
/// executor pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Textual output
    #[serde(default)]
    pub content: String,
    /// Structured output, when the tool has any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error message (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-facing description of the action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_summary: Option<ExecutionSummary>,
    /// Safety classification of the tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_level: Option<SafetyLevel>,
    /// Human-formatted execution time (e.g. "1.2s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            content: content.into(),
            data: None,
            error: None,
            execution_summary: None,
            safety_level: None,
            duration: None,
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            content: String::new(),
            data: None,
            error: Some(error.into()),
            execution_summary: None,
            safety_level: None,
            duration: None,
        }
    }

    /// Create a failed result from a [`ToolError`], keeping only its message
    pub fn from_error(tool_name: impl Into<String>, error: &ToolError) -> Self {
        let message = match &error.details {
            Some(details) => format!("{} ({})", error.message, details),
            None => error.message.clone(),
        };
        Self::failure(tool_name, message)
    }

    /// Attach structured data
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_summary(mut self, summary: ExecutionSummary) -> Self {
        self.execution_summary = Some(summary);
        self
    }

    pub fn with_safety_level(mut self, level: SafetyLevel) -> Self {
        self.safety_level = Some(level);
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the error message
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Payload sent back to the model as the function response.
    pub fn to_response_value(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "success": self.success,
            "content": self.content,
        });
        if let Some(error) = &self.error {
            value["error"] = serde_json::Value::String(error.clone());
        }
        if let Some(data) = &self.data {
            value["data"] = data.clone();
        }
        value
    }
}

impl std::fmt::Display for ToolResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.error, self.success) {
            (Some(error), false) => write!(f, "{} failed: {}", self.tool_name, error),
            (None, false) => write!(f, "{} failed", self.tool_name),
            _ => write!(f, "{}", self.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error() {
        let err = ToolError::not_found("/path/to/file").with_details("File does not exist");

        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.message.contains("/path/to/file"));
        assert_eq!(
            err.to_string(),
            "[NOT_FOUND] Resource not found: /path/to/file (File does not exist)"
        );
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("read", "file contents").with_duration("12ms");

        assert!(result.is_success());
        assert_eq!(result.content, "file contents");
        assert!(result.error().is_none());
        assert_eq!(result.duration.as_deref(), Some("12ms"));
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::from_error("write", &ToolError::permission_denied("/etc/passwd"));

        assert!(!result.is_success());
        assert!(result.content.is_empty());
        assert_eq!(result.error(), Some("Permission denied: /etc/passwd"));
    }

    #[test]
    fn test_response_value() {
        let ok = ToolResult::success("grep", "a.rs:1: fn main")
            .with_data(serde_json::json!({"matches": 1}));
        let value = ok.to_response_value();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["matches"], 1);
        assert!(value.get("error").is_none());

        let failed = ToolResult::failure("grep", "bad regex").to_response_value();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["error"], "bad regex");
    }
}
