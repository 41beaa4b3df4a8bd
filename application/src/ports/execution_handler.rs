//! Execution progress port.
//!
//! [`ExecutionHandler`] is an **output port** that the presentation layer
//! implements to follow a run in real time.
//!
//! # Example Implementation
//!
//! ```ignore
//! use conductor_application::ports::execution_handler::ExecutionHandler;
//!
//! struct Printer;
//!
//! impl ExecutionHandler for Printer {
//!     fn on_text(&self, chunk: &str) {
//!         print!("{}", chunk);
//!     }
//! }
//! ```

use conductor_domain::{ToolCall, ToolResult};
use std::time::Duration;

/// Callbacks for executor progress.
///
/// All methods have default no-op implementations, so implementers only
/// need to override the callbacks they care about.
pub trait ExecutionHandler: Send + Sync {
    /// Called for each text chunk streamed by the model
    fn on_text(&self, _chunk: &str) {}

    /// Called before a tool call enters the pipeline
    fn on_tool_start(&self, _call: &ToolCall) {}

    /// Called once a tool call has finished, successfully or not
    fn on_tool_end(&self, _tool_name: &str, _result: &ToolResult) {}

    /// Called periodically while a tool is still running
    fn on_tool_progress(&self, _tool_name: &str, _elapsed: Duration) {}

    /// Called when the safety pre-flight starts
    fn on_tool_validating(&self, _tool_name: &str) {}

    /// Called when a user-visible call was approved
    fn on_tool_approved(&self, _tool_name: &str) {}

    /// Called when a call was blocked by safety or permissions
    fn on_tool_denied(&self, _tool_name: &str, _reason: &str) {}

    /// Called when the run fails
    fn on_error(&self, _message: &str) {}

    /// Called for each pre-flight warning
    fn on_warning(&self, _tool_name: &str, _warning: &str) {}
}

/// No-op handler used when nobody is listening.
pub struct NoExecutionHandler;

impl ExecutionHandler for NoExecutionHandler {}
