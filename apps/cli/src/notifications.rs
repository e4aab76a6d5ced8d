//! Console rendering of action notifications.

use neomarket_core::notifications::{Notification, NotificationSink};

/// Prints each notification to stderr as a one-line toast and mirrors it
/// into the log.
#[derive(Clone, Default)]
pub struct ConsoleNotificationSink;

impl ConsoleNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

pub fn toast(notification: &Notification) -> String {
    match notification {
        Notification::Success { message, .. } => format!("✓ {}", message),
        Notification::Error {
            action, message, ..
        } => format!("✗ {} failed: {}", action.label(), message),
    }
}

impl NotificationSink for ConsoleNotificationSink {
    fn notify(&self, notification: Notification) {
        match &notification {
            Notification::Success {
                action, cycle_id, ..
            } => tracing::debug!(?action, ?cycle_id, "action succeeded"),
            Notification::Error {
                action, cycle_id, ..
            } => tracing::debug!(?action, ?cycle_id, "action failed"),
        }
        eprintln!("{}", toast(&notification));
    }
}
