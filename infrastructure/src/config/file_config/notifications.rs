//! Notification configuration from TOML (`[notifications]` section)

use conductor_application::NotificationConfig;
use serde::{Deserialize, Serialize};

/// Raw notification configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNotificationsConfig {
    /// Keep only warnings and errors
    pub quiet: bool,
    /// Keep progress heartbeats too
    pub verbose: bool,
    /// Forward to desktop notifications
    pub os_alerts: bool,
    /// Tools whose non-error notifications are dropped
    pub silenced_tools: Vec<String>,
    /// Ring buffer size
    pub capacity: usize,
}

impl Default for FileNotificationsConfig {
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

impl FileNotificationsConfig {
    pub fn to_notification_config(&self) -> NotificationConfig {
        let mut config = NotificationConfig::default()
            .with_quiet(self.quiet)
            .with_verbose(self.verbose)
            .with_os_alerts(self.os_alerts);
        config.silenced_tools = self.silenced_tools.clone();
        config.capacity = self.capacity;
        config
    }
}
