//! Risk classification for tools.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered risk level of a tool: `Safe < Caution < Dangerous < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    /// Read-only, no side effects
    Safe,
    /// Modifies local state in a recoverable way
    #[default]
    Caution,
    /// Arbitrary side effects (shell, bulk changes)
    Dangerous,
    /// Remote or irreversible effects
    Critical,
}

impl SafetyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyLevel::Safe => "safe",
            SafetyLevel::Caution => "caution",
            SafetyLevel::Dangerous => "dangerous",
            SafetyLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Broad grouping used in summaries and audit output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    FileSystem,
    Shell,
    Search,
    VersionControl,
    Remote,
    Memory,
    Agent,
    Unknown,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::FileSystem => "file_system",
            ToolCategory::Shell => "shell",
            ToolCategory::Search => "search",
            ToolCategory::VersionControl => "version_control",
            ToolCategory::Remote => "remote",
            ToolCategory::Memory => "memory",
            ToolCategory::Agent => "agent",
            ToolCategory::Unknown => "unknown",
        }
    }
}
