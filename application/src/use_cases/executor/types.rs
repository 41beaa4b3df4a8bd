//! Type definitions for the executor.

use crate::ports::llm_client::LlmError;
use conductor_domain::{
    Arguments, DomainError, ExecutionSummary, PreFlightCheck, SafetyLevel, TokenUsage, ToolCall,
};
use thiserror::Error;
use tokio::time::Instant;

/// Errors that end an `execute` call.
///
/// Tool failures never surface here; they become error results the model
/// sees on the next turn.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("LLM error: {0}")]
    Llm(LlmError),

    #[error("Invalid history: {0}")]
    History(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ExecutorError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutorError::Cancelled)
    }
}

impl From<LlmError> for ExecutorError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Cancelled => ExecutorError::Cancelled,
            other => ExecutorError::Llm(other),
        }
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteOutput {
    /// The model's answer, or synthesized fallback text.
    pub final_text: String,
    /// Tokens across every model call of the run.
    pub usage: TokenUsage,
    /// Tool names in the order they ran (with repeats).
    pub tools_used: Vec<String>,
    /// Loop iterations consumed.
    pub iterations: usize,
    /// True when the budget ran out and `final_text` is synthesized.
    pub used_fallback: bool,
}

/// Bookkeeping for one call while it moves through the pipeline.
#[derive(Debug, Clone)]
pub struct ExecutionInfo {
    pub start_time: Instant,
    pub call_id: String,
    pub tool_name: String,
    pub args: Arguments,
    pub safety_level: SafetyLevel,
    pub summary: Option<ExecutionSummary>,
    pub pre_flight: Option<PreFlightCheck>,
    pub parent_tool: Option<String>,
}

impl ExecutionInfo {
    pub fn new(call: &ToolCall, safety_level: SafetyLevel, parent_tool: Option<String>) -> Self {
        Self {
            start_time: Instant::now(),
            call_id: call.id.clone(),
            tool_name: call.tool_name.clone(),
            args: call.arguments.clone(),
            safety_level,
            summary: None,
            pre_flight: None,
            parent_tool,
        }
    }

    pub fn warnings(&self) -> &[String] {
        self.pre_flight
            .as_ref()
            .map(|c| c.warnings.as_slice())
            .unwrap_or_default()
    }
}
