//! Size-capping [`ResultCompactor`].
//!
//! Command output keeps its head and tail, since errors and summaries tend to
//! be at the end. Everything else keeps the head.

use conductor_application::ports::compactor::ResultCompactor;
use conductor_domain::ToolResult;
use std::collections::HashMap;

/// Default character budget for one result
pub const DEFAULT_MAX_CHARS: usize = 30_000;

/// Tools whose output is cut in the middle instead of at the end.
const HEAD_TAIL_TOOLS: &[&str] = &["bash", "shell", "ssh"];

/// Truncates tool output to a per-tool character limit.
#[derive(Debug, Clone)]
pub struct TruncatingCompactor {
    max_chars: usize,
    tool_limits: HashMap<String, usize>,
}

impl TruncatingCompactor {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            tool_limits: HashMap::new(),
        }
    }

    pub fn with_tool_limit(mut self, tool: impl Into<String>, max_chars: usize) -> Self {
        self.tool_limits.insert(tool.into(), max_chars);
        self
    }

    pub fn with_tool_limits(mut self, limits: HashMap<String, usize>) -> Self {
        self.tool_limits.extend(limits);
        self
    }

    pub fn limit_for(&self, tool_name: &str) -> usize {
        self.tool_limits
            .get(tool_name)
            .copied()
            .unwrap_or(self.max_chars)
    }
}

impl Default for TruncatingCompactor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl ResultCompactor for TruncatingCompactor {
    fn compact_for_type(&self, tool_name: &str, mut result: ToolResult) -> ToolResult {
        let limit = self.limit_for(tool_name);
        let total = result.content.chars().count();
        if total <= limit {
            return result;
        }

        result.content = if HEAD_TAIL_TOOLS.iter().any(|t| *t == tool_name) {
            head_tail(&result.content, total, limit)
        } else {
            head(&result.content, total, limit)
        };
        tracing::debug!(tool = %tool_name, original_chars = total, limit, "Compacted tool output");
        result
    }
}

fn head(text: &str, total: usize, limit: usize) -> String {
    let kept: String = text.chars().take(limit).collect();
    format!(
        "{}\n\n... [truncated: {} more characters]",
        kept,
        total - limit
    )
}

fn head_tail(text: &str, total: usize, limit: usize) -> String {
    let head_len = limit / 2;
    let tail_len = limit - head_len;
    let head: String = text.chars().take(head_len).collect();
    let tail: String = text.chars().skip(total - tail_len).collect();
    format!(
        "{}\n\n... [{} characters omitted] ...\n\n{}",
        head,
        total - limit,
        tail
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(tool: &str, content: &str) -> ToolResult {
        ToolResult::success(tool, content)
    }

    #[test]
    fn test_short_output_untouched() {
        let compactor = TruncatingCompactor::new(100);
        let out = compactor.compact_for_type("read", result("read", "short"));
        assert_eq!(out.content, "short");
    }

    #[test]
    fn test_head_for_read() {
        let compactor = TruncatingCompactor::new(5);
        let out = compactor.compact_for_type("read", result("read", "abcdefghij"));
        assert_eq!(out.content, "abcde\n\n... [truncated: 5 more characters]");
    }

    #[test]
    fn test_head_tail_for_bash() {
        let compactor = TruncatingCompactor::new(4);
        let out = compactor.compact_for_type("bash", result("bash", "0123456789"));
        assert_eq!(out.content, "01\n\n... [6 characters omitted] ...\n\n89");
    }

    #[test]
    fn test_per_tool_limit() {
        let compactor = TruncatingCompactor::new(1000).with_tool_limit("grep", 3);
        assert_eq!(compactor.limit_for("grep"), 3);
        assert_eq!(compactor.limit_for("glob"), 1000);

        let out = compactor.compact_for_type("grep", result("grep", "a:1\nb:2"));
        assert!(out.content.starts_with("a:1\n\n... [truncated"));
    }

    #[test]
    fn test_multibyte_safe() {
        let compactor = TruncatingCompactor::new(3);
        let out = compactor.compact_for_type("read", result("read", "日本語テキスト"));
        assert!(out.content.starts_with("日本語\n"));
    }

    #[test]
    fn test_metadata_preserved() {
        let compactor = TruncatingCompactor::new(1);
        let original = result("read", "abc").with_duration("5ms");
        let out = compactor.compact_for_type("read", original);
        assert_eq!(out.duration.as_deref(), Some("5ms"));
        assert!(out.success);
    }
}
