//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Truncate a path from the left, keeping the file name visible.
///
/// `"/very/long/path/to/src/main.rs"` becomes `".../to/src/main.rs"`.
pub fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut start = path.len() - keep.min(path.len());
    while start < path.len() && !path.is_char_boundary(start) {
        start += 1;
    }
    let tail = &path[start..];
    // Prefer cutting at a separator so the first component isn't mangled
    let tail = match tail.find('/') {
        Some(idx) if idx + 1 < tail.len() => &tail[idx..],
        _ => tail,
    };
    format!("...{}", tail)
}

/// Collapse a command onto a single line and truncate it for display.
pub fn truncate_command(command: &str, max_len: usize) -> String {
    let single_line = command.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&single_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // 'あ' is 3 bytes; max_len=8 -> target=5 -> back to boundary 3
        assert_eq!(truncate("あいうえお", 8), "あ...");
        assert_eq!(truncate("あいう", 9), "あいう");
    }

    #[test]
    fn test_truncate_path_keeps_file_name() {
        let path = "/home/user/projects/conductor/src/executor/pipeline.rs";
        let short = truncate_path(path, 30);
        assert!(short.starts_with("..."));
        assert!(short.ends_with("pipeline.rs"));
        assert!(short.len() <= 30);
    }

    #[test]
    fn test_truncate_path_short_is_unchanged() {
        assert_eq!(truncate_path("src/main.rs", 30), "src/main.rs");
    }

    #[test]
    fn test_truncate_command_collapses_whitespace() {
        assert_eq!(truncate_command("cargo   test\n  --all", 40), "cargo test --all");
        assert_eq!(truncate_command("echo aaaaaaaaaaaaaaaa", 10), "echo aa...");
    }
}
