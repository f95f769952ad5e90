//! Display surface for queued notifications

use crate::domain::NotificationRequest;

/// Receives the show / exit / remove steps of one notification at a time.
pub trait NotificationSink: Send + Sync {
    fn show(&self, request: &NotificationRequest);

    /// Start the exit transition of the visible notification.
    fn begin_exit(&self);

    /// Drop the visible notification's node.
    fn remove(&self);
}
