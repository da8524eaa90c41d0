use crate::ports::PlatformFuture;
use crate::types::worker::{NotificationOptions, ShownNotification};

/// The registration's notification store.
///
/// Reads are not guaranteed to observe earlier writes: a closed notification
/// may still be listed, and showing one may or may not replace an existing
/// notification with the same tag.
pub trait NotificationRegistry: Clone + Send + Sync + 'static {
    fn get_notifications<'a>(&'a self, tag: &'a str) -> PlatformFuture<'a, Vec<ShownNotification>>;

    fn show_notification<'a>(
        &'a self,
        title: &'a str,
        options: &'a NotificationOptions,
    ) -> PlatformFuture<'a, ()>;

    /// Fire and forget, like `Notification.close()`.
    fn close(&self, notification: &ShownNotification);
}
