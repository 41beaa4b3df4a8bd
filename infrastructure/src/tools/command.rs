//! Command execution tool: bash

use async_trait::async_trait;
use conductor_application::ports::tool::{Tool, ToolContext};
use conductor_domain::{
    Arguments, ArgumentsExt, ToolDefinition, ToolError, ToolParameter, ToolResult,
};
use std::process::Stdio;
use tokio::process::Command;

/// Tool name constant
pub const BASH: &str = "bash";

/// Maximum output size (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Runs a shell command and returns its combined output
pub struct BashTool {
    definition: ToolDefinition,
}

impl BashTool {
    pub fn new() -> Self {
        let definition = ToolDefinition::new(
            BASH,
            "Execute a shell command and return its output. Use with caution.",
        )
        .with_parameter(
            ToolParameter::new("command", "The command to execute", true).with_type("string"),
        )
        .with_parameter(
            ToolParameter::new("working_dir", "Working directory for the command", false)
                .with_type("path"),
        );
        Self { definition }
    }
}

impl Default for BashTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for BashTool {
    fn name(&self) -> &str {
        BASH
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext, args: &Arguments) -> Result<ToolResult, ToolError> {
        let command = args.require_string("command").map_err(ToolError::invalid_argument)?;

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };

        let working_dir = match args.get_string("working_dir") {
            Some(dir) => Some(ctx.resolve_path(dir)),
            None => ctx.working_dir.clone(),
        };
        if let Some(dir) = working_dir {
            if !dir.is_dir() {
                return Err(ToolError::not_found(format!(
                    "Working directory does not exist: {}",
                    dir.display()
                )));
            }
            cmd.current_dir(dir);
        }

        // Dropping the child (timeout, cancellation) kills the process
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            ToolError::execution_failed(format!("Failed to spawn command: {}", e))
        })?;

        let output = tokio::select! {
            out = child.wait_with_output() => out.map_err(|e| {
                ToolError::execution_failed(format!("Failed to wait for command: {}", e))
            })?,
            _ = ctx.cancel.cancelled() => return Err(ToolError::cancelled()),
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let combined = combine_output(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        );
        let data = serde_json::json!({ "exit_code": exit_code, "bytes": combined.len() });

        // A non-zero exit is still a successful tool run; the model decides what to do
        let content = if output.status.success() {
            combined
        } else {
            format!("Command exited with code {}\n{}", exit_code, combined)
        };
        Ok(ToolResult::success(BASH, content).with_data(data))
    }
}

/// Join stdout and stderr, capped at [`MAX_OUTPUT_SIZE`].
fn combine_output(stdout: &str, stderr: &str) -> String {
    let mut combined = String::from(stdout);
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n--- stderr ---\n");
        }
        combined.push_str(stderr);
    }

    if combined.len() > MAX_OUTPUT_SIZE {
        let mut end = MAX_OUTPUT_SIZE;
        while !combined.is_char_boundary(end) {
            end -= 1;
        }
        combined.truncate(end);
        combined.push_str("\n... (output truncated)");
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    fn ctx() -> ToolContext {
        ToolContext::new(CancellationToken::new(), "test")
    }

    fn command(cmd: &str) -> Arguments {
        [("command".to_string(), serde_json::json!(cmd))]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_bash_echo() {
        let result = BashTool::new()
            .execute(&ctx(), &command("echo hello"))
            .await
            .unwrap();

        assert!(result.is_success());
        assert!(result.content.contains("hello"));
        assert_eq!(result.data.unwrap()["exit_code"], 0);
    }

    #[tokio::test]
    async fn test_bash_uses_context_working_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = ctx().with_working_dir(Some(temp_dir.path().to_path_buf()));

        let result = BashTool::new().execute(&ctx, &command("pwd")).await.unwrap();

        let name = temp_dir.path().file_name().unwrap().to_str().unwrap();
        assert!(result.content.contains(name));
    }

    #[tokio::test]
    async fn test_bash_nonzero_exit() {
        let result = BashTool::new()
            .execute(&ctx(), &command("echo oops >&2; exit 3"))
            .await
            .unwrap();

        assert!(result.is_success());
        assert!(result.content.starts_with("Command exited with code 3"));
        assert!(result.content.contains("oops"));
        assert_eq!(result.data.unwrap()["exit_code"], 3);
    }

    #[tokio::test]
    async fn test_bash_invalid_working_dir() {
        let mut args = command("echo test");
        args.insert("working_dir".to_string(), "/nonexistent/directory".into());

        let err = BashTool::new().execute(&ctx(), &args).await.unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bash_cancelled() {
        let ctx = ctx();
        ctx.cancel.cancel();

        let err = BashTool::new()
            .execute(&ctx, &command("sleep 5"))
            .await
            .unwrap_err();
        assert_eq!(err.code, "CANCELLED");
    }

    #[test]
    fn test_bash_rejects_empty_command() {
        let err = BashTool::new().validate(&command("")).unwrap_err();
        assert!(err.contains("must not be empty"));
    }

    #[test]
    fn test_combine_output() {
        assert_eq!(combine_output("out", ""), "out");
        assert_eq!(combine_output("", "err"), "err");
        assert_eq!(combine_output("out", "err"), "out\n--- stderr ---\nerr");

        let big = "é".repeat(MAX_OUTPUT_SIZE);
        let combined = combine_output(&big, "");
        assert!(combined.ends_with("(output truncated)"));
    }
}
