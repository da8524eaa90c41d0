use serde::{Deserialize, Serialize};

/// A browser push subscription as produced by `PushSubscription.toJSON()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub expiration_time: Option<f64>,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// What the service worker receives as push data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub body: String,
    pub tag: String,
    #[serde(default)]
    pub force_close: bool,
    #[serde(default)]
    pub show_if_focused: bool,
}

/// Body of `POST /api/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub subscription: PushSubscription,
    #[serde(default)]
    pub is_delayed: bool,
    pub payload: NotificationPayload,
}
