//! Search tools: glob, grep
//!
//! Both walk the filesystem synchronously, so the work runs on the blocking
//! pool and is abandoned if the call is cancelled.

use async_trait::async_trait;
use conductor_application::ports::tool::{Tool, ToolContext};
use conductor_domain::{
    Arguments, ArgumentsExt, ToolDefinition, ToolError, ToolParameter, ToolResult,
};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Tool name constants
pub const GLOB: &str = "glob";
pub const GREP: &str = "grep";

/// Maximum number of results to return
const MAX_RESULTS: usize = 1000;

/// Maximum file size for grep (5 MB)
const MAX_GREP_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Run blocking search work, racing cancellation.
async fn run_blocking<F>(ctx: &ToolContext, work: F) -> Result<ToolResult, ToolError>
where
    F: FnOnce() -> Result<ToolResult, ToolError> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(work);
    tokio::select! {
        joined = handle => joined.map_err(|e| {
            ToolError::execution_failed(format!("Search task failed: {}", e))
        })?,
        _ = ctx.cancel.cancelled() => Err(ToolError::cancelled()),
    }
}

fn base_dir(ctx: &ToolContext, args: &Arguments) -> PathBuf {
    ctx.resolve_path(args.get_string("path").unwrap_or("."))
}

// ==================== glob ====================

/// Finds files by glob pattern
pub struct GlobTool {
    definition: ToolDefinition,
}

impl GlobTool {
    pub fn new() -> Self {
        let definition = ToolDefinition::new(
            GLOB,
            "Search for files matching a glob pattern (e.g., '**/*.rs', 'src/*.txt')",
        )
        .with_parameter(
            ToolParameter::new("pattern", "Glob pattern to match files", true).with_type("string"),
        )
        .with_parameter(
            ToolParameter::new(
                "path",
                "Base directory to search from (default: current dir)",
                false,
            )
            .with_type("path"),
        )
        .with_parameter(
            ToolParameter::new(
                "max_results",
                "Maximum number of results to return (default: 1000)",
                false,
            )
            .with_type("number"),
        );
        Self { definition }
    }
}

impl Default for GlobTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GlobTool {
    fn name(&self) -> &str {
        GLOB
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext, args: &Arguments) -> Result<ToolResult, ToolError> {
        let pattern = args
            .require_string("pattern")
            .map_err(ToolError::invalid_argument)?
            .to_string();
        let base = base_dir(ctx, args);
        let max_results = args
            .get_i64("max_results")
            .map(|n| n.max(1) as usize)
            .unwrap_or(MAX_RESULTS)
            .min(MAX_RESULTS);

        run_blocking(ctx, move || glob_files(&base, &pattern, max_results)).await
    }
}

fn glob_files(base: &Path, pattern: &str, max_results: usize) -> Result<ToolResult, ToolError> {
    let full_pattern = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        format!("{}/{}", base.display(), pattern)
    };

    let entries = glob::glob(&full_pattern)
        .map_err(|e| ToolError::invalid_argument(format!("Invalid glob pattern: {}", e)))?;

    let mut results = Vec::new();
    let mut error_count = 0;
    let mut limited = false;
    for entry in entries {
        if results.len() >= max_results {
            limited = true;
            break;
        }
        match entry {
            Ok(path) => results.push(path.display().to_string()),
            Err(_) => error_count += 1,
        }
    }

    let match_count = results.len();
    let mut output = results.join("\n");
    if limited {
        output.push_str(&format!("\n... (limited to {} results)", max_results));
    }
    if error_count > 0 {
        output.push_str(&format!("\n({} paths could not be accessed)", error_count));
    }

    Ok(ToolResult::success(GLOB, output).with_data(serde_json::json!({
        "match_count": match_count,
    })))
}

// ==================== grep ====================

/// Regex search over file contents
pub struct GrepTool {
    definition: ToolDefinition,
}

impl GrepTool {
    pub fn new() -> Self {
        let definition = ToolDefinition::new(
            GREP,
            "Search for a pattern within file contents using regex",
        )
        .with_parameter(
            ToolParameter::new("pattern", "Regex pattern to search for", true).with_type("string"),
        )
        .with_parameter(
            ToolParameter::new("path", "File or directory to search in (default: current dir)", false)
                .with_type("path"),
        )
        .with_parameter(
            ToolParameter::new(
                "file_pattern",
                "Glob pattern to filter files (e.g., '*.rs')",
                false,
            )
            .with_type("string"),
        )
        .with_parameter(
            ToolParameter::new(
                "context_lines",
                "Number of context lines before and after match",
                false,
            )
            .with_type("number"),
        )
        .with_parameter(
            ToolParameter::new("case_insensitive", "Perform case-insensitive search", false)
                .with_type("boolean"),
        );
        Self { definition }
    }
}

impl Default for GrepTool {
    fn default() -> Self {
        Self::new()
    }
}

struct GrepRequest {
    path: PathBuf,
    display: String,
    regex: Regex,
    file_pattern: Option<String>,
    context_lines: usize,
}

#[async_trait]
impl Tool for GrepTool {
    fn name(&self) -> &str {
        GREP
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext, args: &Arguments) -> Result<ToolResult, ToolError> {
        let pattern = args.require_string("pattern").map_err(ToolError::invalid_argument)?;
        let path = base_dir(ctx, args);
        if !path.exists() {
            return Err(ToolError::not_found(args.get_string("path").unwrap_or(".")));
        }

        let pattern = if args.get_bool("case_insensitive").unwrap_or(false) {
            format!("(?i){}", pattern)
        } else {
            pattern.to_string()
        };
        let regex = Regex::new(&pattern)
            .map_err(|e| ToolError::invalid_argument(format!("Invalid regex pattern: {}", e)))?;

        let request = GrepRequest {
            display: path.display().to_string(),
            path,
            regex,
            file_pattern: args.get_string("file_pattern").map(str::to_string),
            context_lines: args.get_i64("context_lines").unwrap_or(0).max(0) as usize,
        };
        run_blocking(ctx, move || Ok(grep_files(&request))).await
    }
}

fn grep_files(request: &GrepRequest) -> ToolResult {
    let files = if request.path.is_file() {
        vec![request.path.clone()]
    } else {
        collect_files(&request.path, request.file_pattern.as_deref())
    };

    let mut results = Vec::new();
    let mut total_matches = 0;

    'files: for file_path in files {
        if fs::metadata(&file_path).is_ok_and(|m| m.len() > MAX_GREP_FILE_SIZE) {
            continue;
        }
        // Binary and unreadable files are skipped
        let Ok(content) = fs::read_to_string(&file_path) else {
            continue;
        };
        let lines: Vec<&str> = content.lines().collect();
        let file_display = file_path.display().to_string();

        for (line_num, line) in lines.iter().enumerate() {
            if results.len() >= MAX_RESULTS {
                break 'files;
            }
            if !request.regex.is_match(line) {
                continue;
            }
            total_matches += 1;

            if request.context_lines > 0 {
                let start_line = line_num.saturating_sub(request.context_lines);
                let end_line = (line_num + request.context_lines + 1).min(lines.len());

                let mut block = format!("{}:", file_display);
                for (i, ctx_line) in lines[start_line..end_line].iter().enumerate() {
                    let actual = start_line + i + 1;
                    let marker = if actual == line_num + 1 { ">" } else { " " };
                    block.push_str(&format!("\n{}{}: {}", marker, actual, ctx_line));
                }
                results.push(block);
            } else {
                results.push(format!("{}:{}: {}", file_display, line_num + 1, line));
            }
        }
    }

    let mut output = results.join("\n");
    if total_matches >= MAX_RESULTS {
        output.push_str(&format!("\n... (limited to {} matches)", MAX_RESULTS));
    }

    ToolResult::success(GREP, output).with_data(serde_json::json!({
        "match_count": total_matches,
        "path": request.display,
    }))
}

/// Collect files from a directory, optionally filtered by a glob pattern
fn collect_files(dir: &Path, file_pattern: Option<&str>) -> Vec<PathBuf> {
    let pattern = file_pattern.unwrap_or("**/*");
    let full_pattern = format!("{}/{}", dir.display(), pattern);

    match glob::glob(&full_pattern) {
        Ok(paths) => paths
            .flatten()
            .filter(|p| p.is_file())
            .take(MAX_RESULTS)
            .collect(),
        Err(_) => Vec::new(),
    }
}
