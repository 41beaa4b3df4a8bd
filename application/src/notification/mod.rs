//! Human-readable lifecycle notifications.

pub mod entities;
pub mod manager;

pub use entities::{Notification, NotificationStats, NotificationType};
pub use manager::{NotificationManager, NotificationRequest, NotificationSubscriber};
