//! Tool port
//!
//! Defines the capability every executable tool implements and the lookup
//! the executor uses to find tools by name. Concrete tools and the registry
//! live in the infrastructure layer.

use async_trait::async_trait;
use conductor_domain::tool::{
    Arguments, DefaultToolValidator, ToolDefinition, ToolError, ToolResult, ToolValidator,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Per-call execution context handed to [`Tool::execute`].
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Cancelled when the caller gives up or the call times out
    pub cancel: CancellationToken,
    /// Id of the call being executed
    pub call_id: String,
    /// Directory relative paths resolve against
    pub working_dir: Option<PathBuf>,
}

impl ToolContext {
    pub fn new(cancel: CancellationToken, call_id: impl Into<String>) -> Self {
        Self {
            cancel,
            call_id: call_id.into(),
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// Resolve `path` against the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let candidate = PathBuf::from(path);
        match &self.working_dir {
            Some(dir) if candidate.is_relative() => dir.join(candidate),
            _ => candidate,
        }
    }
}

/// A named capability the model can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool
    fn name(&self) -> &str;

    /// Machine-readable declaration sent to the model
    fn definition(&self) -> &ToolDefinition;

    /// Check arguments before execution.
    ///
    /// The default checks required parameters and rejects unknown ones.
    fn validate(&self, args: &Arguments) -> Result<(), String> {
        DefaultToolValidator.validate(args, self.definition())
    }

    /// Execute the tool.
    ///
    /// Implementations should watch `ctx.cancel` during long operations.
    async fn execute(&self, ctx: &ToolContext, args: &Arguments) -> Result<ToolResult, ToolError>;
}

/// Name-based tool lookup used by the executor.
pub trait ToolLookup: Send + Sync {
    fn get(&self, name: &str) -> Option<Arc<dyn Tool>>;

    /// Names of all available tools, sorted
    fn names(&self) -> Vec<String>;

    /// Declarations of all available tools
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.names()
            .iter()
            .filter_map(|n| self.get(n))
            .map(|t| t.definition().clone())
            .collect()
    }
}
