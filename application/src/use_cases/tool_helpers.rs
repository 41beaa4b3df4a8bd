//! Shared helpers for tool use cases.

use conductor_domain::ToolCall;

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`file_path`, `path`, `command`, `pattern`,
/// `query`) first, then falls back to the first string value found.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let keys = ["file_path", "path", "command", "pattern", "query"];
    for key in &keys {
        if let Some(serde_json::Value::String(s)) = call.arguments.get(*key) {
            return truncate_preview(s, 50);
        }
    }
    // Fallback: first string value, by key for a stable result
    let mut names: Vec<&String> = call.arguments.keys().collect();
    names.sort();
    for name in names {
        if let Some(s) = call.arguments[name].as_str() {
            return truncate_preview(s, 50);
        }
    }
    String::new()
}

fn truncate_preview(s: &str, max_len: usize) -> String {
    let single_line = s.lines().next().unwrap_or("");
    if single_line.chars().count() <= max_len && single_line.len() == s.len() {
        s.to_string()
    } else {
        let truncated: String = single_line.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_call(pairs: &[(&str, serde_json::Value)]) -> ToolCall {
        pairs
            .iter()
            .fold(ToolCall::new("c1", "test_tool"), |call, (k, v)| {
                call.with_arg(*k, v.clone())
            })
    }

    #[test]
    fn test_path_key_preferred() {
        let call = make_call(&[
            ("file_path", serde_json::json!("src/main.rs")),
            ("other", serde_json::json!("ignored")),
        ]);
        assert_eq!(tool_args_preview(&call), "src/main.rs");
    }

    #[test]
    fn test_command_key() {
        let call = make_call(&[("command", serde_json::json!("cargo test"))]);
        assert_eq!(tool_args_preview(&call), "cargo test");
    }

    #[test]
    fn test_fallback_to_first_string() {
        let call = make_call(&[
            ("zeta", serde_json::json!("last")),
            ("alpha", serde_json::json!("first")),
        ]);
        assert_eq!(tool_args_preview(&call), "first");
    }

    #[test]
    fn test_no_string_values() {
        let call = make_call(&[("count", serde_json::json!(42))]);
        assert_eq!(tool_args_preview(&call), "");
    }

    #[test]
    fn test_truncation() {
        let call = make_call(&[("path", serde_json::json!("a".repeat(100)))]);
        let result = tool_args_preview(&call);
        assert!(result.chars().count() <= 50);
        assert!(result.ends_with('…'));
    }

    #[test]
    fn test_multiline_command_is_cut_at_first_line() {
        let call = make_call(&[("command", serde_json::json!("echo a\necho b"))]);
        assert_eq!(tool_args_preview(&call), "echo a…");
    }
}
