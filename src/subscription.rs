//! State behind the subscription page.
//!
//! The page script owns the browser objects (registration, `PushManager`);
//! the rules deciding what it may do with them live here.

use crate::types::push::{NotificationPayload, PushSubscription, SendRequest};

use time::{Duration, OffsetDateTime};

/// A subscription expiring sooner than this is dropped on page load.
pub const EXPIRY_GRACE: Duration = Duration::minutes(5);

/// Whether an existing subscription is still worth sending to.
///
/// A zero `expirationTime` counts as "never expires", the same as a missing one.
pub fn is_usable(subscription: &PushSubscription, now: OffsetDateTime) -> bool {
    let Some(expires_at_ms) = subscription.expiration_time.filter(|ms| *ms != 0.0) else {
        return true;
    };
    let now_ms = (now.unix_timestamp_nanos() / 1_000_000) as f64;
    let grace_ms = EXPIRY_GRACE.whole_milliseconds() as f64;
    now_ms <= expires_at_ms - grace_ms
}

/// Which of the page's buttons are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionControls {
    pub subscribe: bool,
    pub unsubscribe: bool,
    pub send: bool,
}

impl SubscriptionControls {
    pub fn for_subscription(subscription: Option<&PushSubscription>) -> Self {
        let subscribed = subscription.is_some();
        Self {
            subscribe: !subscribed,
            unsubscribe: subscribed,
            send: subscribed,
        }
    }
}

/// The form fields, before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub body: String,
    pub tag: String,
    pub is_delayed: bool,
    pub force_close: bool,
    pub show_if_focused: bool,
}

impl Default for NotificationDraft {
    fn default() -> Self {
        Self {
            body: "Hello world!".to_string(),
            tag: "hello".to_string(),
            is_delayed: true,
            force_close: false,
            show_if_focused: false,
        }
    }
}

impl NotificationDraft {
    pub fn into_request(self, subscription: PushSubscription) -> SendRequest {
        SendRequest {
            subscription,
            is_delayed: self.is_delayed,
            payload: NotificationPayload {
                body: self.body,
                tag: self.tag,
                force_close: self.force_close,
                show_if_focused: self.show_if_focused,
            },
        }
    }
}
