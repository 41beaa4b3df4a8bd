//! Hooks port
//!
//! User-configured commands run around each tool call. Hook failures are
//! logged and never fail the call.

use async_trait::async_trait;
use conductor_domain::{Arguments, ToolResult};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Hook '{hook}' failed: {message}")]
    Failed { hook: String, message: String },

    #[error("Hook '{0}' timed out")]
    Timeout(String),
}

/// Runner for pre/post/on-error hooks.
///
/// All methods default to doing nothing.
#[async_trait]
pub trait HooksRunner: Send + Sync {
    async fn run_pre_tool(&self, _tool_name: &str, _args: &Arguments) -> Result<(), HookError> {
        Ok(())
    }

    async fn run_post_tool(
        &self,
        _tool_name: &str,
        _args: &Arguments,
        _result: &ToolResult,
    ) -> Result<(), HookError> {
        Ok(())
    }

    async fn run_on_error(
        &self,
        _tool_name: &str,
        _args: &Arguments,
        _error: &str,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

/// No-op implementation for when no hooks are configured.
pub struct NoHooks;

impl HooksRunner for NoHooks {}
