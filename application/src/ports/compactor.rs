//! Result compaction port.

use conductor_domain::ToolResult;

/// Shrinks successful results before they go back to the model.
pub trait ResultCompactor: Send + Sync {
    fn compact_for_type(&self, tool_name: &str, result: ToolResult) -> ToolResult;
}
