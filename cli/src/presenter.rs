//! Console output for executor progress.

use colored::Colorize;
use conductor_application::ExecutionHandler;
use conductor_domain::{ToolCall, ToolResult};
use std::time::Duration;

/// Prints tool lifecycle events to stderr so stdout carries only the answer.
pub struct ConsolePresenter {
    quiet: bool,
}

impl ConsolePresenter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ExecutionHandler for ConsolePresenter {
    fn on_tool_start(&self, call: &ToolCall) {
        if self.quiet {
            return;
        }
        eprintln!("{} {}", "▶".cyan(), call.tool_name.bold());
    }

    fn on_tool_end(&self, tool_name: &str, result: &ToolResult) {
        if self.quiet {
            return;
        }
        let duration = result.duration.as_deref().unwrap_or("-");
        if result.is_success() {
            eprintln!("  {} {} ({})", "✓".green(), tool_name, duration.dimmed());
        } else {
            eprintln!(
                "  {} {}: {}",
                "✗".red(),
                tool_name,
                result.error().unwrap_or("failed").red()
            );
        }
    }

    fn on_tool_progress(&self, tool_name: &str, elapsed: Duration) {
        if self.quiet {
            return;
        }
        eprintln!(
            "  {} {} still running ({}s)",
            "…".yellow(),
            tool_name,
            elapsed.as_secs()
        );
    }

    fn on_tool_approved(&self, tool_name: &str) {
        if !self.quiet {
            eprintln!("  {} {} approved", "●".green(), tool_name);
        }
    }

    fn on_tool_denied(&self, tool_name: &str, reason: &str) {
        // Denials are shown even in quiet mode
        eprintln!("  {} {} blocked: {}", "⛔".red(), tool_name.bold(), reason);
    }

    fn on_warning(&self, tool_name: &str, warning: &str) {
        if !self.quiet {
            eprintln!("  {} {}: {}", "!".yellow().bold(), tool_name, warning.yellow());
        }
    }

    fn on_error(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}
