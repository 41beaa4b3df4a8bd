//! Permission policy configuration from TOML (`[permissions]` section)

use serde::{Deserialize, Serialize};

/// Raw permission configuration from TOML
///
/// # Example
///
/// ```toml
/// [permissions]
/// deny = ["ssh"]
/// ask_dangerous = true
/// ```
///
/// Names in `deny` always lose. A non-empty `allow` list blocks every tool
/// it does not name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePermissionsConfig {
    /// Tools that may run (empty means all)
    pub allow: Vec<String>,
    /// Tools that never run
    pub deny: Vec<String>,
    /// Require confirmation for dangerous and critical tools
    pub ask_dangerous: bool,
}
