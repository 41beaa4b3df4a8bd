//! Result compaction configuration from TOML (`[compaction]` section)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw compaction configuration from TOML
///
/// # Example
///
/// ```toml
/// [compaction]
/// max_chars = 30000
///
/// [compaction.tool_limits]
/// bash = 20000
/// grep = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCompactionConfig {
    pub enabled: bool,
    /// Default character limit for successful tool output
    pub max_chars: usize,
    /// Per-tool overrides of `max_chars`
    pub tool_limits: HashMap<String, usize>,
}

impl Default for FileCompactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_chars: 30_000,
            tool_limits: HashMap::new(),
        }
    }
}
