//! Executor parameters: pipeline and loop control.
//!
//! [`ExecutorConfig`] groups the static parameters that control the
//! [`Executor`](crate::use_cases::executor::Executor): per-call timeouts,
//! the safety toggle, breaker tuning and the run's identity.
//! These are application-layer concerns, not domain policy.

use crate::resilience::CircuitBreakerConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Executor control parameters.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Upper bound for a single tool call.
    pub tool_timeout: Duration,
    /// How often `on_tool_progress` fires while a tool runs.
    pub heartbeat_interval: Duration,
    /// Run the safety pre-flight before each call.
    pub safety_checks: bool,
    /// The user explicitly confirmed destructive operations for this run.
    pub confirmed: bool,
    /// Identifier written to every audit entry.
    pub session_id: String,
    /// Tool that spawned this executor, for nested runs.
    pub parent_tool: Option<String>,
    /// Working directory for tool execution.
    pub working_dir: Option<PathBuf>,
    /// Overrides the history-based iteration budget.
    pub max_iterations: Option<usize>,
    /// Per-tool breaker tuning.
    pub breaker: CircuitBreakerConfig,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            tool_timeout: Duration::from_secs(120),
            heartbeat_interval: Duration::from_secs(5),
            safety_checks: true,
            confirmed: false,
            session_id: "default".to_string(),
            parent_tool: None,
            working_dir: None,
            max_iterations: None,
            breaker: CircuitBreakerConfig::default(),
        }
    }
}

impl ExecutorConfig {
    // ==================== Builder Methods ====================

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub fn with_safety_checks(mut self, enabled: bool) -> Self {
        self.safety_checks = enabled;
        self
    }

    pub fn with_confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = id.into();
        self
    }

    pub fn with_parent_tool(mut self, tool: impl Into<String>) -> Self {
        self.parent_tool = Some(tool.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn with_breaker(mut self, breaker: CircuitBreakerConfig) -> Self {
        self.breaker = breaker;
        self
    }
}

/// Notification filtering and delivery.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Keep only errors and warnings.
    pub quiet: bool,
    /// Also keep progress notifications.
    pub verbose: bool,
    /// Forward success/warning/error to the desktop.
    pub os_alerts: bool,
    /// Tools whose non-error notifications are dropped.
    pub silenced_tools: Vec<String>,
    /// Ring buffer size.
    pub capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            verbose: false,
            os_alerts: false,
            silenced_tools: Vec::new(),
            capacity: 100,
        }
    }
}

impl NotificationConfig {
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_os_alerts(mut self, enabled: bool) -> Self {
        self.os_alerts = enabled;
        self
    }

    pub fn with_silenced_tool(mut self, tool: impl Into<String>) -> Self {
        self.silenced_tools.push(tool.into());
        self
    }

    pub fn is_silenced(&self, tool: &str) -> bool {
        self.silenced_tools.iter().any(|t| t == tool)
    }
}
