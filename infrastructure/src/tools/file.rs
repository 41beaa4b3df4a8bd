//! File operation tools: read, write, edit

use async_trait::async_trait;
use conductor_application::ports::tool::{Tool, ToolContext};
use conductor_domain::{
    Arguments, ArgumentsExt, ToolDefinition, ToolError, ToolParameter, ToolResult,
};
use std::io::ErrorKind;

/// Tool name constants
pub const READ: &str = "read";
pub const WRITE: &str = "write";
pub const EDIT: &str = "edit";

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

fn io_error(e: std::io::Error, path: &str, action: &str) -> ToolError {
    match e.kind() {
        ErrorKind::NotFound => ToolError::not_found(path),
        ErrorKind::PermissionDenied => ToolError::permission_denied(path),
        _ => ToolError::execution_failed(format!("Failed to {} file: {}", action, e)),
    }
}

// ==================== read ====================

/// Reads a text file, optionally a line window of it
pub struct ReadTool {
    definition: ToolDefinition,
}

impl ReadTool {
    pub fn new() -> Self {
        let definition = ToolDefinition::new(READ, "Read the contents of a file at the specified path")
            .with_parameter(
                ToolParameter::new("file_path", "Path to the file to read", true).with_type("path"),
            )
            .with_parameter(
                ToolParameter::new(
                    "offset",
                    "Line number to start reading from (0-indexed)",
                    false,
                )
                .with_type("number"),
            )
            .with_parameter(
                ToolParameter::new("limit", "Maximum number of lines to read", false)
                    .with_type("number"),
            );
        Self { definition }
    }
}

impl Default for ReadTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ReadTool {
    fn name(&self) -> &str {
        READ
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext, args: &Arguments) -> Result<ToolResult, ToolError> {
        let path_str = args.require_string("file_path").map_err(ToolError::invalid_argument)?;
        let path = ctx.resolve_path(path_str);

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| io_error(e, path_str, "read"))?;
        if !metadata.is_file() {
            return Err(ToolError::invalid_argument(format!(
                "'{}' is not a file",
                path_str
            )));
        }
        if metadata.len() > MAX_READ_SIZE {
            return Err(ToolError::invalid_argument(format!(
                "File too large ({} bytes). Maximum size is {} bytes",
                metadata.len(),
                MAX_READ_SIZE
            )));
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(e, path_str, "read"))?;
        let total_lines = content.lines().count();

        let offset = args.get_i64("offset").unwrap_or(0).max(0) as usize;
        let limit = args.get_i64("limit").map(|l| l.max(0) as usize);
        let output = if offset > 0 || limit.is_some() {
            let take = limit.unwrap_or(usize::MAX);
            content
                .lines()
                .skip(offset)
                .take(take)
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            content
        };

        Ok(ToolResult::success(READ, output).with_data(serde_json::json!({
            "path": path_str,
            "total_lines": total_lines,
        })))
    }
}

// ==================== write ====================

/// Creates or overwrites a file
pub struct WriteTool {
    definition: ToolDefinition,
}

impl WriteTool {
    pub fn new() -> Self {
        let definition = ToolDefinition::new(
            WRITE,
            "Write content to a file at the specified path. Creates the file if it doesn't exist, or overwrites if it does.",
        )
        .with_parameter(
            ToolParameter::new("file_path", "Path to the file to write", true).with_type("path"),
        )
        .with_parameter(
            ToolParameter::new("content", "Content to write to the file", true).with_type("string"),
        )
        .with_parameter(
            ToolParameter::new(
                "create_dirs",
                "Create parent directories if they don't exist",
                false,
            )
            .with_type("boolean"),
        );
        Self { definition }
    }
}

impl Default for WriteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WriteTool {
    fn name(&self) -> &str {
        WRITE
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    // The content may legitimately be empty, so only the path is required to be non-empty
    fn validate(&self, args: &Arguments) -> Result<(), String> {
        let path = args.require_string("file_path")?;
        if path.trim().is_empty() {
            return Err("Parameter 'file_path' must not be empty".to_string());
        }
        args.require_string("content")?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext, args: &Arguments) -> Result<ToolResult, ToolError> {
        let path_str = args.require_string("file_path").map_err(ToolError::invalid_argument)?;
        let content = args.require_string("content").map_err(ToolError::invalid_argument)?;
        let path = ctx.resolve_path(path_str);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if args.get_bool("create_dirs").unwrap_or(false) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    ToolError::execution_failed(format!(
                        "Failed to create parent directories: {}",
                        e
                    ))
                })?;
            } else if !parent.exists() {
                return Err(ToolError::not_found(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| io_error(e, path_str, "write"))?;

        Ok(ToolResult::success(
            WRITE,
            format!("Successfully wrote {} bytes to {}", content.len(), path_str),
        )
        .with_data(serde_json::json!({ "path": path_str, "bytes": content.len() })))
    }
}

// ==================== edit ====================

/// Replaces an exact string inside a file
pub struct EditTool {
    definition: ToolDefinition,
}

impl EditTool {
    pub fn new() -> Self {
        let definition = ToolDefinition::new(
            EDIT,
            "Replace an exact string in a file. old_string must match exactly once unless replace_all is set.",
        )
        .with_parameter(
            ToolParameter::new("file_path", "Path to the file to edit", true).with_type("path"),
        )
        .with_parameter(
            ToolParameter::new("old_string", "Exact text to replace", true).with_type("string"),
        )
        .with_parameter(
            ToolParameter::new("new_string", "Replacement text", false).with_type("string"),
        )
        .with_parameter(
            ToolParameter::new("replace_all", "Replace every occurrence", false)
                .with_type("boolean"),
        );
        Self { definition }
    }
}

impl Default for EditTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply the replacement, returning the new text and the number of matches replaced.
fn replace_exact(
    text: &str,
    old: &str,
    new: &str,
    replace_all: bool,
) -> Result<(String, usize), ToolError> {
    let count = text.matches(old).count();
    match count {
        0 => Err(ToolError::not_found("old_string in file")),
        1 => Ok((text.replacen(old, new, 1), 1)),
        n if replace_all => Ok((text.replace(old, new), n)),
        n => Err(ToolError::invalid_argument(format!(
            "old_string appears {} times; add surrounding context or set replace_all",
            n
        ))),
    }
}

#[async_trait]
impl Tool for EditTool {
    fn name(&self) -> &str {
        EDIT
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext, args: &Arguments) -> Result<ToolResult, ToolError> {
        let path_str = args.require_string("file_path").map_err(ToolError::invalid_argument)?;
        let old = args.require_string("old_string").map_err(ToolError::invalid_argument)?;
        let new = args.get_string("new_string").unwrap_or("");
        let replace_all = args.get_bool("replace_all").unwrap_or(false);
        let path = ctx.resolve_path(path_str);

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(e, path_str, "read"))?;
        let (updated, replaced) = replace_exact(&text, old, new, replace_all)?;
        tokio::fs::write(&path, updated)
            .await
            .map_err(|e| io_error(e, path_str, "write"))?;

        let plural = if replaced == 1 { "" } else { "s" };
        Ok(ToolResult::success(
            EDIT,
            format!("Edited {}: {} replacement{}", path_str, replaced, plural),
        )
        .with_data(serde_json::json!({ "path": path_str, "replacements": replaced })))
    }
}
