//! Static safety metadata for the known tool set.

use super::level::{SafetyLevel, ToolCategory};
use std::time::Duration;

/// What the host knows about a tool's risk before running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSafetyMetadata {
    pub display_name: &'static str,
    pub level: SafetyLevel,
    pub category: ToolCategory,
    pub risk_factors: &'static [&'static str],
    pub impact: &'static str,
    pub example: &'static str,
    pub best_practices: &'static [&'static str],
    pub max_execution_time: Duration,
    pub requires_confirmation: bool,
    pub allows_retry: bool,
}

impl ToolSafetyMetadata {
    /// Neutral metadata applied to tools without an entry.
    pub const fn unknown() -> Self {
        Self {
            display_name: "Tool",
            level: SafetyLevel::Caution,
            category: ToolCategory::Unknown,
            risk_factors: &["Unrecognized tool; effects are unknown"],
            impact: "Unknown",
            example: "",
            best_practices: &[],
            max_execution_time: Duration::from_secs(120),
            requires_confirmation: false,
            allows_retry: false,
        }
    }
}

/// Look up the metadata for a tool name.
pub fn lookup(tool_name: &str) -> Option<ToolSafetyMetadata> {
    let meta = match tool_name {
        "read" => ToolSafetyMetadata {
            display_name: "Read File",
            level: SafetyLevel::Safe,
            category: ToolCategory::FileSystem,
            risk_factors: &["May expose sensitive file contents"],
            impact: "None (read-only)",
            example: r#"{"file_path": "src/main.rs"}"#,
            best_practices: &["Read a file before editing it"],
            max_execution_time: Duration::from_secs(30),
            requires_confirmation: false,
            allows_retry: true,
        },
        "write" => ToolSafetyMetadata {
            display_name: "Write File",
            level: SafetyLevel::Caution,
            category: ToolCategory::FileSystem,
            risk_factors: &["Overwrites existing content", "Creates parent directories"],
            impact: "Replaces the file on disk",
            example: r#"{"file_path": "notes.md", "content": "..."}"#,
            best_practices: &[
                "Read the existing file first",
                "Prefer edit for small changes",
            ],
            max_execution_time: Duration::from_secs(30),
            requires_confirmation: false,
            allows_retry: false,
        },
        "edit" => ToolSafetyMetadata {
            display_name: "Edit File",
            level: SafetyLevel::Caution,
            category: ToolCategory::FileSystem,
            risk_factors: &["Ambiguous search text can change the wrong location"],
            impact: "Modifies part of a file",
            example: r#"{"file_path": "src/lib.rs", "old_string": "fn a()", "new_string": "fn b()"}"#,
            best_practices: &["Include enough surrounding context to make old_string unique"],
            max_execution_time: Duration::from_secs(30),
            requires_confirmation: false,
            allows_retry: false,
        },
        "bash" | "shell" => ToolSafetyMetadata {
            display_name: "Shell Command",
            level: SafetyLevel::Dangerous,
            category: ToolCategory::Shell,
            risk_factors: &[
                "Arbitrary side effects",
                "May modify or delete files",
                "May access the network",
            ],
            impact: "Anything the current user can do",
            example: r#"{"command": "cargo test"}"#,
            best_practices: &[
                "Prefer dedicated tools for reading and searching",
                "Avoid destructive flags unless necessary",
            ],
            max_execution_time: Duration::from_secs(300),
            requires_confirmation: false,
            allows_retry: false,
        },
        "grep" => ToolSafetyMetadata {
            display_name: "Search Content",
            level: SafetyLevel::Safe,
            category: ToolCategory::Search,
            risk_factors: &[],
            impact: "None (read-only)",
            example: r#"{"pattern": "fn main", "path": "src"}"#,
            best_practices: &["Narrow the search path for large repositories"],
            max_execution_time: Duration::from_secs(60),
            requires_confirmation: false,
            allows_retry: true,
        },
        "glob" => ToolSafetyMetadata {
            display_name: "Find Files",
            level: SafetyLevel::Safe,
            category: ToolCategory::Search,
            risk_factors: &[],
            impact: "None (read-only)",
            example: r#"{"pattern": "**/*.rs"}"#,
            best_practices: &[],
            max_execution_time: Duration::from_secs(30),
            requires_confirmation: false,
            allows_retry: true,
        },
        "batch" => ToolSafetyMetadata {
            display_name: "Batch Operation",
            level: SafetyLevel::Dangerous,
            category: ToolCategory::FileSystem,
            risk_factors: &["Touches many files at once", "Broad patterns match unexpected files"],
            impact: "Bulk modification or deletion",
            example: r#"{"operation": "rename", "pattern": "src/**/*.old"}"#,
            best_practices: &[
                "Preview matches with glob first",
                "Use the narrowest pattern possible",
            ],
            max_execution_time: Duration::from_secs(120),
            requires_confirmation: true,
            allows_retry: false,
        },
        "git" => ToolSafetyMetadata {
            display_name: "Git",
            level: SafetyLevel::Caution,
            category: ToolCategory::VersionControl,
            risk_factors: &["History rewriting commands are irreversible"],
            impact: "Repository state",
            example: r#"{"command": "status"}"#,
            best_practices: &["Avoid force pushes and hard resets"],
            max_execution_time: Duration::from_secs(120),
            requires_confirmation: false,
            allows_retry: true,
        },
        "ssh" => ToolSafetyMetadata {
            display_name: "Remote Command",
            level: SafetyLevel::Critical,
            category: ToolCategory::Remote,
            risk_factors: &["Runs on another machine", "Effects may not be recoverable"],
            impact: "Remote host state",
            example: r#"{"host": "build-1", "command": "uptime"}"#,
            best_practices: &["Verify the target host before running"],
            max_execution_time: Duration::from_secs(300),
            requires_confirmation: true,
            allows_retry: false,
        },
        "semantic_search" => ToolSafetyMetadata {
            display_name: "Semantic Search",
            level: SafetyLevel::Safe,
            category: ToolCategory::Search,
            risk_factors: &[],
            impact: "None (read-only)",
            example: r#"{"query": "where are retries configured"}"#,
            best_practices: &[],
            max_execution_time: Duration::from_secs(60),
            requires_confirmation: false,
            allows_retry: true,
        },
        "memory" => ToolSafetyMetadata {
            display_name: "Memory",
            level: SafetyLevel::Caution,
            category: ToolCategory::Memory,
            risk_factors: &["Persists information across sessions"],
            impact: "Stored notes",
            example: r#"{"action": "save", "content": "..."}"#,
            best_practices: &["Do not store secrets"],
            max_execution_time: Duration::from_secs(30),
            requires_confirmation: false,
            allows_retry: true,
        },
        "spawn_agent" => ToolSafetyMetadata {
            display_name: "Sub-agent",
            level: SafetyLevel::Caution,
            category: ToolCategory::Agent,
            risk_factors: &["Sub-agent runs its own tools"],
            impact: "Whatever the sub-agent's tools do",
            example: r#"{"task": "summarize the test failures"}"#,
            best_practices: &["Give the sub-agent a narrow task"],
            max_execution_time: Duration::from_secs(600),
            requires_confirmation: false,
            allows_retry: false,
        },
        "undo" => ToolSafetyMetadata {
            display_name: "Undo",
            level: SafetyLevel::Caution,
            category: ToolCategory::FileSystem,
            risk_factors: &["Reverts recent file changes"],
            impact: "Restores previous file contents",
            example: "{}",
            best_practices: &[],
            max_execution_time: Duration::from_secs(30),
            requires_confirmation: false,
            allows_retry: false,
        },
        _ => return None,
    };
    Some(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tools_have_metadata() {
        for name in ["read", "write", "edit", "bash", "grep", "glob", "batch", "git", "ssh"] {
            assert!(lookup(name).is_some(), "missing metadata for {name}");
        }
        assert!(lookup("teleport").is_none());
    }

    #[test]
    fn read_only_tools_are_safe() {
        assert_eq!(lookup("read").unwrap().level, SafetyLevel::Safe);
        assert_eq!(lookup("grep").unwrap().level, SafetyLevel::Safe);
        assert_eq!(lookup("ssh").unwrap().level, SafetyLevel::Critical);
        assert_eq!(ToolSafetyMetadata::unknown().level, SafetyLevel::Caution);
    }
}
