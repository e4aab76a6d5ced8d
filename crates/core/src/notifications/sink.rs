//! Notification sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::Notification;

/// Trait for surfacing action outcomes to the user.
///
/// `notify()` must not block and must not fail; delivery is best-effort.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// No-op implementation for contexts that don't show notifications.
#[derive(Clone, Default)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn notify(&self, _notification: Notification) {}
}

/// Collecting sink, used by tests and by callers that render in batches.
#[derive(Clone, Default)]
pub struct MemoryNotificationSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(Notification::is_error)
            .collect()
    }

    /// Removes and returns everything collected so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemoryNotificationSink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}
