//! Audit configuration from TOML (`[audit]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw audit configuration from TOML
///
/// # Example
///
/// ```toml
/// [audit]
/// enabled = true
/// path = "~/.local/share/conductor/audit.jsonl"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// Write a JSONL audit trail
    pub enabled: bool,
    /// Audit file path (defaults to the data dir)
    pub path: Option<PathBuf>,
}

impl Default for FileAuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl FileAuditConfig {
    /// Path the audit file is written to.
    ///
    /// Falls back to `$XDG_DATA_HOME/conductor/audit.jsonl`, then to
    /// `./conductor-audit.jsonl` when no data dir is known.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return expand_home(path);
        }
        dirs::data_dir()
            .map(|d| d.join("conductor").join("audit.jsonl"))
            .unwrap_or_else(|| PathBuf::from("conductor-audit.jsonl"))
    }
}

fn expand_home(path: &std::path::Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
