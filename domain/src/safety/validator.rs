//! Rule-based pre-flight validation.
//!
//! The validator never touches the filesystem or runs anything; it inspects
//! the tool name and arguments only.

use super::level::SafetyLevel;
use super::metadata::{ToolSafetyMetadata, lookup};
use super::preflight::{ExecutionSummary, PreFlightCheck, SafetyContext};
use crate::core::string::{truncate, truncate_command, truncate_path};
use crate::tool::arguments::{Arguments, ArgumentsExt};
use std::path::{Component, Path, PathBuf};

const SYSTEM_DIRS: &[&str] = &["etc", "usr", "bin", "sbin", "boot", "sys", "proc"];

const SOURCE_EXTENSIONS: &[&str] = &[
    "rs", "go", "py", "js", "jsx", "ts", "tsx", "java", "kt", "swift", "c", "h", "cc", "cpp",
    "hpp", "rb", "php", "cs", "scala",
];

const BROAD_PATTERNS: &[&str] = &["*", "**", "**/*"];

const PATH_KEYS: &[&str] = &["file_path", "path"];

const MAX_TARGET_LEN: usize = 60;
const MAX_COMMAND_LEN: usize = 80;

/// Static risk metadata plus per-tool pre-flight rules.
#[derive(Debug, Clone, Default)]
pub struct SafetyValidator;

impl SafetyValidator {
    pub fn new() -> Self {
        Self
    }

    /// Metadata for `tool_name`, or neutral caution metadata if unknown.
    pub fn metadata(&self, tool_name: &str) -> ToolSafetyMetadata {
        lookup(tool_name).unwrap_or_else(ToolSafetyMetadata::unknown)
    }

    pub fn level(&self, tool_name: &str) -> SafetyLevel {
        self.metadata(tool_name).level
    }

    /// Run the rules for `tool_name` against `args`.
    pub fn pre_flight(
        &self,
        tool_name: &str,
        args: &Arguments,
        ctx: &SafetyContext,
    ) -> PreFlightCheck {
        let mut check = PreFlightCheck::new();

        let meta = match lookup(tool_name) {
            Some(meta) => meta,
            None => {
                check.add_warning(format!(
                    "Unknown tool '{}'; applying default caution",
                    tool_name
                ));
                ToolSafetyMetadata::unknown()
            }
        };

        match tool_name {
            "bash" | "shell" | "ssh" => {
                if let Some(command) = args.get_string("command") {
                    check_shell(command, &mut check);
                }
            }
            "write" => check_write(args, &mut check),
            "edit" => check_edit(args, &mut check),
            "batch" => check_batch(args, ctx, &mut check),
            _ => {}
        }

        if meta.requires_confirmation {
            check
                .requirements
                .push(format!("{} requires user confirmation", meta.display_name));
        }
        check
            .suggestions
            .extend(meta.best_practices.iter().map(|s| s.to_string()));

        check
    }

    /// Describe the call for humans: action, target and approval needs.
    pub fn get_summary(&self, tool_name: &str, args: &Arguments) -> ExecutionSummary {
        let meta = self.metadata(tool_name);
        let path = || {
            args.first_string(PATH_KEYS)
                .map(|p| truncate_path(p, MAX_TARGET_LEN))
                .unwrap_or_default()
        };
        let text = |key: &str| {
            args.get_string(key)
                .map(|s| truncate(s, MAX_TARGET_LEN))
                .unwrap_or_default()
        };
        let command = || {
            args.get_string("command")
                .map(|c| truncate_command(c, MAX_COMMAND_LEN))
                .unwrap_or_default()
        };

        let (action, target) = match tool_name {
            "read" => ("Read".to_string(), path()),
            "write" => ("Write".to_string(), path()),
            "edit" => ("Edit".to_string(), path()),
            "bash" | "shell" => ("Run:".to_string(), command()),
            "ssh" => {
                let host = args.get_string("host").unwrap_or("remote");
                (format!("Run on {}:", host), command())
            }
            "grep" => {
                let pattern = text("pattern");
                let target = match args.get_string("path") {
                    Some(p) => format!("'{}' in {}", pattern, truncate_path(p, MAX_TARGET_LEN)),
                    None => format!("'{}'", pattern),
                };
                ("Search for".to_string(), target)
            }
            "glob" => ("Find files matching".to_string(), text("pattern")),
            "batch" => {
                let operation = args.get_string("operation").unwrap_or("operation");
                (format!("Batch {}", operation), text("pattern"))
            }
            "git" => ("Git".to_string(), command()),
            "semantic_search" => ("Search code for".to_string(), text("query")),
            "memory" => {
                let action = args.get_string("action").unwrap_or("update");
                (format!("Memory {}", action), text("key"))
            }
            "spawn_agent" => ("Delegate:".to_string(), text("task")),
            "undo" => ("Undo last change".to_string(), path()),
            other => ("Run tool".to_string(), other.to_string()),
        };

        ExecutionSummary {
            tool_name: tool_name.to_string(),
            display_name: meta.display_name.to_string(),
            action,
            target,
            risk_level: meta.level,
            requires_approval: meta.requires_confirmation || meta.level >= SafetyLevel::Dangerous,
            user_visible: meta.level != SafetyLevel::Safe,
        }
    }
}

// ==================== Shell rules ====================

fn is_separator(token: &str) -> bool {
    matches!(token, ";" | "&&" | "||" | "|" | "&")
}

/// Split a command into words, with every control operator as its own token.
///
/// `ls;rm -rf /` and `a&&b` hide the second command from a plain
/// whitespace split. Command substitution (`$(`, backticks) and subshell
/// parentheses also start a new command. Surrounding quotes are stripped.
fn shell_tokens(command: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(command.len() * 2);
    let mut chars = command.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ';' | '\n' | '`' | '(' | ')' => spaced.push_str(" ; "),
            '$' if chars.peek() == Some(&'(') => {
                chars.next();
                spaced.push_str(" ; ");
            }
            '&' | '|' => {
                spaced.push(' ');
                spaced.push(c);
                if chars.peek() == Some(&c) {
                    chars.next();
                    spaced.push(c);
                }
                spaced.push(' ');
            }
            _ => spaced.push(c),
        }
    }
    spaced
        .split_whitespace()
        .map(|t| t.trim_matches(|q| q == '\'' || q == '"').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// `/`, `//`, `/.` and `/tmp/..` all name the root directory.
fn is_root_target(arg: &str) -> bool {
    matches!(arg, "/*" | "--no-preserve-root")
        || (arg.starts_with('/') && normalize_path(arg) == Path::new("/"))
}

fn program_is(token: &str, name: &str) -> bool {
    token == name || token.rsplit('/').next() == Some(name)
}

/// Arguments following the command at `start`, up to the next separator.
fn command_args<'a>(tokens: &'a [&'a str], start: usize) -> &'a [&'a str] {
    let rest = &tokens[start + 1..];
    let end = rest.iter().position(|t| is_separator(t)).unwrap_or(rest.len());
    &rest[..end]
}

fn has_short_flag(args: &[&str], flag: char, long: &str) -> bool {
    args.iter().any(|a| {
        *a == long || (a.starts_with('-') && !a.starts_with("--") && a[1..].contains(flag))
    })
}

fn check_shell(command: &str, check: &mut PreFlightCheck) {
    let owned = shell_tokens(command);
    let tokens: Vec<&str> = owned.iter().map(String::as_str).collect();
    let lower = command.to_lowercase();
    let compact: String = lower.chars().filter(|c| !c.is_whitespace()).collect();

    for (i, token) in tokens.iter().enumerate() {
        if program_is(token, "rm") {
            let args = command_args(&tokens, i);
            let recursive = has_short_flag(args, 'r', "--recursive")
                || has_short_flag(args, 'R', "--recursive");
            let force = has_short_flag(args, 'f', "--force");
            let targets_root = args.iter().any(|a| is_root_target(a));

            if recursive && targets_root {
                check.add_error("Blocked: recursive deletion of the root filesystem");
            } else if recursive && force {
                check.add_warning("Destructive command: rm -rf permanently deletes files");
            } else if recursive {
                check.add_warning("Destructive command: rm -r deletes directories");
            }
        }

        if program_is(token, "chmod") {
            let args = command_args(&tokens, i);
            let recursive = has_short_flag(args, 'R', "--recursive");
            if recursive && args.iter().any(|a| is_root_target(a)) {
                check.add_error("Blocked: recursive permission change on /");
            }
            if args.contains(&"777") {
                check.add_warning("chmod 777 makes files world-writable");
            }
        }

        if token.to_lowercase().starts_with("mkfs") {
            check.add_error("Blocked: filesystem creation (mkfs)");
        }

        if token.starts_with("of=/dev/") {
            check.add_error("Blocked: raw write to a device");
        }

        if program_is(token, "kill") && command_args(&tokens, i).contains(&"-9") {
            check.add_warning("kill -9 terminates processes without cleanup");
        }

        if matches!(*token, "shutdown" | "reboot" | "halt" | "poweroff") {
            check.add_warning(format!("'{}' affects the whole machine", token));
        }
    }

    if [">/dev/sd", ">/dev/nvme", ">/dev/hd"]
        .iter()
        .any(|p| compact.contains(p))
    {
        check.add_error("Blocked: overwriting a disk device");
    }

    if compact.contains(":(){:|:&};:") {
        check.add_error("Blocked: fork bomb");
    }

    if pipes_download_to_shell(&lower) {
        check.add_error("Blocked: piping a download straight into a shell");
    }

    for (pattern, message) in [
        ("drop database", "drop database destroys all data in the database"),
        ("drop table", "drop table destroys the table and its data"),
        ("git reset --hard", "git reset --hard discards uncommitted changes"),
    ] {
        if lower.contains(pattern) {
            check.add_warning(format!("Destructive command: {}", message));
        }
    }

    if tokens.iter().any(|t| t.eq_ignore_ascii_case("truncate")) {
        check.add_warning("Destructive command: truncate discards data");
    }

    if lower.contains("git push")
        && (lower.contains("--force") || tokens.iter().any(|t| *t == "-f"))
    {
        check.add_warning("Destructive command: force push rewrites remote history");
    }
}

/// `curl ... | bash`, `wget -qO- ... | sudo sh` and friends.
fn pipes_download_to_shell(lower: &str) -> bool {
    let segments: Vec<&str> = lower.split('|').map(str::trim).collect();
    segments.windows(2).any(|pair| {
        let downloads = pair[0]
            .split_whitespace()
            .any(|t| program_is(t, "curl") || program_is(t, "wget"));
        let runner = pair[1]
            .split_whitespace()
            .find(|t| *t != "sudo")
            .is_some_and(|t| ["bash", "sh", "zsh"].iter().any(|s| program_is(t, s)));
        downloads && runner
    })
}

// ==================== File rules ====================

/// Lexical normalisation: repeated slashes collapse, `.` is dropped and
/// `..` pops a component. Nothing is resolved on disk.
fn normalize_path(path: &str) -> PathBuf {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// The protected top-level directory `path` lives in, e.g. `/etc/`.
fn system_dir(path: &str) -> Option<String> {
    let normalized = normalize_path(path);
    let mut components = normalized.components();
    if components.next() != Some(Component::RootDir) {
        return None;
    }
    match components.next() {
        Some(Component::Normal(top)) => SYSTEM_DIRS
            .iter()
            .find(|dir| top.to_str() == Some(**dir))
            .map(|dir| format!("/{}/", dir)),
        _ => None,
    }
}

fn is_source_file(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|e| *e == ext))
}

fn check_write(args: &Arguments, check: &mut PreFlightCheck) {
    let Some(path) = args.first_string(PATH_KEYS) else {
        return;
    };
    if let Some(dir) = system_dir(path) {
        check.add_error(format!("Writing to system directory {} is not allowed", dir));
    } else if is_source_file(path) {
        check.add_warning(format!(
            "Overwriting source file {}; read it first so existing code is not lost",
            path
        ));
    }
}

fn check_edit(args: &Arguments, check: &mut PreFlightCheck) {
    if let Some(dir) = args.first_string(PATH_KEYS).and_then(system_dir) {
        check.add_error(format!("Editing files under {} is not allowed", dir));
    }

    match args.get_string("old_string") {
        None | Some("") => check.add_error("Edit requires old_string to locate the change"),
        Some(old) => {
            let distinctive = old
                .chars()
                .any(|c| c.is_ascii_punctuation() || c.is_whitespace());
            if old.chars().count() < 10 && !distinctive {
                check.add_warning(format!(
                    "old_string '{}' is short and may match more than one location",
                    old
                ));
            }
        }
    }

    if args.get_string("new_string").is_none() {
        check.add_warning("new_string is missing; the matched text will be removed");
    }
}

fn check_batch(args: &Arguments, ctx: &SafetyContext, check: &mut PreFlightCheck) {
    if args.get_string("operation") == Some("delete") {
        if ctx.confirmed {
            check.add_warning("Batch delete confirmed; matching files will be removed");
        } else {
            check.add_error("Batch delete requires explicit confirmation");
        }
    }

    let pattern = args.first_string(&["pattern", "glob"]).unwrap_or("").trim();
    if pattern.is_empty() || BROAD_PATTERNS.iter().any(|p| *p == pattern) {
        check.add_error(format!(
            "Batch pattern '{}' is too broad; name the files to target",
            pattern
        ));
    } else if pattern.starts_with('/') {
        check.add_warning(format!(
            "Batch pattern '{}' is absolute and may reach outside the project",
            pattern
        ));
    }
}
