//! Buffered fan-out of notifications.
//!
//! The manager keeps the most recent notifications in a ring buffer, applies
//! the quiet/verbose/silenced filters, then hands each stored notification to
//! the optional subscriber and, for success/warning/error, the desktop alert.

use super::entities::{Notification, NotificationStats, NotificationType};
use crate::config::NotificationConfig;
use crate::ports::alert::DesktopAlert;
use chrono::Utc;
use conductor_domain::{ExecutionSummary, ToolResult};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Callback invoked for every stored notification.
pub type NotificationSubscriber = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Builder-style input for [`NotificationManager::notify`].
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub kind: NotificationType,
    pub tool_name: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub summary: Option<ExecutionSummary>,
}

impl NotificationRequest {
    pub fn new(kind: NotificationType, message: impl Into<String>) -> Self {
        Self {
            kind,
            tool_name: None,
            message: message.into(),
            details: None,
            summary: None,
        }
    }

    pub fn tool(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn summary(mut self, summary: Option<ExecutionSummary>) -> Self {
        self.summary = summary;
        self
    }
}

pub struct NotificationManager {
    config: NotificationConfig,
    buffer: Mutex<VecDeque<Notification>>,
    next_id: AtomicU64,
    subscriber: Option<NotificationSubscriber>,
    alert: Option<Arc<dyn DesktopAlert>>,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(NotificationConfig::default())
    }
}

impl NotificationManager {
    pub fn new(config: NotificationConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            config,
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            next_id: AtomicU64::new(1),
            subscriber: None,
            alert: None,
        }
    }

    pub fn with_subscriber(mut self, subscriber: NotificationSubscriber) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    pub fn with_alert(mut self, alert: Arc<dyn DesktopAlert>) -> Self {
        self.alert = Some(alert);
        self
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Store and deliver a notification.
    ///
    /// Returns the id, or `None` when the filters dropped it.
    pub fn notify(&self, request: NotificationRequest) -> Option<String> {
        if !self.should_keep(request.kind, request.tool_name.as_deref()) {
            return None;
        }

        let id = format!("notif-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id: id.clone(),
            kind: request.kind,
            tool_name: request.tool_name,
            message: request.message,
            details: request.details,
            timestamp: Utc::now(),
            summary: request.summary,
            read: false,
        };

        {
            let mut buffer = self.lock();
            if buffer.len() >= self.config.capacity.max(1) {
                buffer.pop_front();
            }
            buffer.push_back(notification.clone());
        }

        if self.config.os_alerts && notification.kind.is_alertable() {
            if let Some(alert) = &self.alert {
                let title = match &notification.tool_name {
                    Some(tool) => format!("conductor: {}", tool),
                    None => "conductor".to_string(),
                };
                alert.alert(&title, &notification.message);
            }
        }

        if let Some(subscriber) = &self.subscriber {
            let subscriber = Arc::clone(subscriber);
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move { subscriber(&notification) });
                }
                Err(_) => subscriber(&notification),
            }
        }

        Some(id)
    }

    pub fn info(&self, message: impl Into<String>) -> Option<String> {
        self.notify(NotificationRequest::new(NotificationType::Info, message))
    }

    pub fn warning(&self, message: impl Into<String>) -> Option<String> {
        self.notify(NotificationRequest::new(NotificationType::Warning, message))
    }

    pub fn error(&self, message: impl Into<String>) -> Option<String> {
        self.notify(NotificationRequest::new(NotificationType::Error, message))
    }

    // ==================== Tool lifecycle ====================

    /// Safety or permission refused the call.
    pub fn tool_denied(
        &self,
        tool_name: &str,
        reason: &str,
        summary: Option<ExecutionSummary>,
    ) -> Option<String> {
        self.notify(
            NotificationRequest::new(NotificationType::Warning, format!("Blocked {}", tool_name))
                .tool(tool_name)
                .details(reason)
                .summary(summary),
        )
    }

    pub fn tool_approved(&self, tool_name: &str, summary: &ExecutionSummary) -> Option<String> {
        self.notify(
            NotificationRequest::new(NotificationType::Info, format!("Approved: {}", summary))
                .tool(tool_name)
                .summary(Some(summary.clone())),
        )
    }

    pub fn tool_warning(
        &self,
        tool_name: &str,
        warning: &str,
        summary: Option<ExecutionSummary>,
    ) -> Option<String> {
        self.notify(
            NotificationRequest::new(NotificationType::Warning, warning)
                .tool(tool_name)
                .summary(summary),
        )
    }

    pub fn tool_progress(&self, tool_name: &str, message: impl Into<String>) -> Option<String> {
        self.notify(NotificationRequest::new(NotificationType::Progress, message).tool(tool_name))
    }

    /// Terminal notification for a finished call.
    pub fn tool_completed(&self, result: &ToolResult) -> Option<String> {
        let label = result
            .execution_summary
            .as_ref()
            .map(|s| s.describe())
            .unwrap_or_else(|| result.tool_name.clone());
        let timing = result
            .duration
            .as_deref()
            .map(|d| format!(" ({})", d))
            .unwrap_or_default();

        let request = if result.success {
            NotificationRequest::new(NotificationType::Success, format!("{}{}", label, timing))
        } else {
            let mut request = NotificationRequest::new(
                NotificationType::Error,
                format!("{} failed{}", label, timing),
            );
            if let Some(error) = &result.error {
                request = request.details(error.clone());
            }
            request
        };
        self.notify(
            request
                .tool(result.tool_name.clone())
                .summary(result.execution_summary.clone()),
        )
    }

    // ==================== Queries ====================

    /// Up to `limit` notifications, newest first.
    pub fn get_recent(&self, limit: usize) -> Vec<Notification> {
        self.lock().iter().rev().take(limit).cloned().collect()
    }

    /// Unread notifications, oldest first.
    pub fn get_unread(&self) -> Vec<Notification> {
        self.lock().iter().filter(|n| !n.read).cloned().collect()
    }

    /// Returns false if the id is not (or no longer) buffered.
    pub fn mark_read(&self, id: &str) -> bool {
        match self.lock().iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&self) {
        for notification in self.lock().iter_mut() {
            notification.read = true;
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> NotificationStats {
        let buffer = self.lock();
        let mut stats = NotificationStats {
            total: buffer.len(),
            ..Default::default()
        };
        for notification in buffer.iter() {
            if !notification.read {
                stats.unread += 1;
            }
            *stats.by_type.entry(notification.kind).or_insert(0) += 1;
            if let Some(tool) = &notification.tool_name {
                *stats.by_tool.entry(tool.clone()).or_insert(0) += 1;
            }
        }
        stats
    }

    // ==================== Private ====================

    fn should_keep(&self, kind: NotificationType, tool_name: Option<&str>) -> bool {
        if kind == NotificationType::Error {
            return true;
        }
        if tool_name.is_some_and(|t| self.config.is_silenced(t)) {
            return false;
        }
        if self.config.quiet {
            return kind == NotificationType::Warning;
        }
        if kind == NotificationType::Progress {
            return self.config.verbose;
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }
}
