//! Notifications
//!
//! Fire-and-forget toasts for the UI layer.

use mockall::automock;

/// Notification severity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Something worked.
    Success,

    /// Something failed.
    Error,

    /// Neutral information.
    Info,
}

/// A user-visible notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,

    /// Message text
    pub message: String,
}

impl Notification {
    /// A success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// An error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// An informational toast.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// Receives notifications; delivery is not acknowledged.
#[automock]
pub trait Notifier: Send + Sync {
    /// Show a notification.
    fn notify(&self, notification: Notification);
}
