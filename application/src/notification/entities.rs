//! Notification records.

use chrono::{DateTime, Utc};
use conductor_domain::ExecutionSummary;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Kind of notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
    Progress,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::Success => "success",
            NotificationType::Warning => "warning",
            NotificationType::Error => "error",
            NotificationType::Progress => "progress",
        }
    }

    /// Whether this kind is forwarded to the desktop.
    pub fn is_alertable(&self) -> bool {
        matches!(
            self,
            NotificationType::Success | NotificationType::Warning | NotificationType::Error
        )
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A human-readable lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ExecutionSummary>,
    pub read: bool,
}

/// Counts over the buffered notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationStats {
    pub total: usize,
    pub unread: usize,
    pub by_type: HashMap<NotificationType, usize>,
    pub by_tool: HashMap<String, usize>,
}

impl NotificationStats {
    pub fn count(&self, kind: NotificationType) -> usize {
        self.by_type.get(&kind).copied().unwrap_or(0)
    }
}
