//! Executor configuration from TOML (`[executor]` section)

use conductor_application::{CircuitBreakerConfig, ExecutorConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw executor configuration from TOML
///
/// # Example
///
/// ```toml
/// [executor]
/// tool_timeout_secs = 120
/// heartbeat_interval_secs = 5
/// safety_checks = true
/// breaker_failure_threshold = 5
/// breaker_cooldown_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Upper bound for one tool call, in seconds
    pub tool_timeout_secs: u64,
    /// Progress heartbeat period in seconds (0 disables it)
    pub heartbeat_interval_secs: u64,
    /// Run safety pre-flight checks
    pub safety_checks: bool,
    /// Treat destructive operations as confirmed
    pub confirmed: bool,
    /// Session id written to audit entries
    pub session_id: Option<String>,
    /// Fixed iteration budget instead of the history-based one
    pub max_iterations: Option<usize>,
    /// Directory relative tool paths resolve against
    pub working_dir: Option<PathBuf>,
    /// Consecutive failures before a tool's breaker opens
    pub breaker_failure_threshold: u32,
    /// Seconds an open breaker waits before a trial call
    pub breaker_cooldown_secs: u64,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            tool_timeout_secs: 120,
            heartbeat_interval_secs: 5,
            safety_checks: true,
            confirmed: false,
            session_id: None,
            max_iterations: None,
            working_dir: None,
            breaker_failure_threshold: 5,
            breaker_cooldown_secs: 60,
        }
    }
}

impl FileExecutorConfig {
    pub fn to_executor_config(&self) -> ExecutorConfig {
        let breaker = CircuitBreakerConfig::default()
            .failure_threshold(self.breaker_failure_threshold)
            .cooldown(Duration::from_secs(self.breaker_cooldown_secs));

        let mut config = ExecutorConfig::default()
            .with_tool_timeout(Duration::from_secs(self.tool_timeout_secs))
            .with_heartbeat_interval(Duration::from_secs(self.heartbeat_interval_secs))
            .with_safety_checks(self.safety_checks)
            .with_confirmed(self.confirmed)
            .with_breaker(breaker);
        if let Some(id) = &self.session_id {
            config = config.with_session_id(id);
        }
        if let Some(max) = self.max_iterations {
            config = config.with_max_iterations(max);
        }
        if let Some(dir) = &self.working_dir {
            config = config.with_working_dir(dir);
        }
        config
    }
}
