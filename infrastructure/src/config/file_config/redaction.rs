//! Secret redaction configuration from TOML (`[redaction]` section)

use serde::{Deserialize, Serialize};

/// Raw redaction configuration from TOML
///
/// # Example
///
/// ```toml
/// [redaction]
/// enabled = true
/// extra_patterns = ["corp-[0-9a-f]{32}"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRedactionConfig {
    pub enabled: bool,
    /// Additional regexes whose matches are masked
    pub extra_patterns: Vec<String>,
}

impl Default for FileRedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extra_patterns: Vec::new(),
        }
    }
}
