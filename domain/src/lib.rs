//! Domain layer for conductor
//!
//! This crate contains the core types and pure rules of the agent runtime.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tool**: what a tool declares ([`ToolDefinition`]), how the model calls
//!   it ([`ToolCall`]) and what comes back ([`ToolResult`])
//! - **Safety**: static risk metadata and rule-based pre-flight checks
//!   ([`SafetyValidator`])
//! - **Session**: the conversation [`History`] and collapsed model replies
//! - **Agent**: iteration budgeting and fallback answers

pub mod agent;
pub mod core;
pub mod safety;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use agent::{calculate_max_iterations, fallback_text};
pub use core::{duration::format_duration, error::DomainError};
pub use safety::{
    ExecutionSummary, PreFlightCheck, SafetyContext, SafetyLevel, SafetyValidator,
    ToolCategory, ToolSafetyMetadata,
};
pub use session::{
    Content, FunctionResponse, History, LlmResponse, Part, Role, StreamEvent, TokenUsage,
};
pub use tool::{
    Arguments, ArgumentsExt, DefaultToolValidator, ToolCall, ToolDefinition, ToolError,
    ToolParameter, ToolResult, ToolValidator,
};
