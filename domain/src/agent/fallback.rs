//! Deterministic answer used when the model never produces final text.

use crate::core::string::truncate;
use crate::tool::value_objects::ToolResult;

/// Reply when no tool ran at all.
pub const NO_TOOLS_FALLBACK: &str = "I'm here to help. What would you like me to do?";

const PREVIEW_LEN: usize = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Empty,
    Error,
}

impl Outcome {
    fn of(result: &ToolResult) -> Self {
        if !result.success {
            Outcome::Error
        } else if result.content.trim().is_empty() {
            Outcome::Empty
        } else {
            Outcome::Success
        }
    }
}

/// Build the fallback answer from the tools used and the last result.
pub fn fallback_text(tools_used: &[String], last: Option<&ToolResult>) -> String {
    let Some(last) = last else {
        return NO_TOOLS_FALLBACK.to_string();
    };
    if tools_used.is_empty() {
        return NO_TOOLS_FALLBACK.to_string();
    }

    let mut text = describe(last);

    let mut unique: Vec<&str> = Vec::new();
    for name in tools_used {
        if !unique.contains(&name.as_str()) {
            unique.push(name);
        }
    }
    text.push_str("\n\nTools used: ");
    text.push_str(&unique.join(", "));
    text
}

fn describe(result: &ToolResult) -> String {
    let preview = truncate(result.content.trim(), PREVIEW_LEN);
    let error = result.error.as_deref().unwrap_or("unknown error");

    match (result.tool_name.as_str(), Outcome::of(result)) {
        ("read", Outcome::Success) => format!("Here is what the file contains:\n\n{}", preview),
        ("read", Outcome::Empty) => "The file is empty.".to_string(),
        ("read", Outcome::Error) => format!("I couldn't read the file: {}", error),

        ("grep", Outcome::Success) => format!("I found these matches:\n\n{}", preview),
        ("grep", Outcome::Empty) => "No matches were found.".to_string(),
        ("grep", Outcome::Error) => format!("The search failed: {}", error),

        ("glob", Outcome::Success) => format!("These files match:\n\n{}", preview),
        ("glob", Outcome::Empty) => "No files matched the pattern.".to_string(),
        ("glob", Outcome::Error) => format!("I couldn't list the files: {}", error),

        ("bash", Outcome::Success) => format!("The command finished. Output:\n\n{}", preview),
        ("bash", Outcome::Empty) => "The command finished with no output.".to_string(),
        ("bash", Outcome::Error) => format!("The command failed: {}", error),

        ("write", Outcome::Success | Outcome::Empty) => "The file was written.".to_string(),
        ("write", Outcome::Error) => format!("Writing the file failed: {}", error),

        ("edit", Outcome::Success | Outcome::Empty) => "The edit was applied.".to_string(),
        ("edit", Outcome::Error) => format!("The edit could not be applied: {}", error),

        (tool, Outcome::Success) => format!("The {} tool returned:\n\n{}", tool, preview),
        (tool, Outcome::Empty) => format!("The {} tool finished with no output.", tool),
        (tool, Outcome::Error) => format!("The {} tool failed: {}", tool, error),
    }
}
