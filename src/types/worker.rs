use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

/// A notification as returned by `registration.getNotifications()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShownNotification {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub body: String,
    pub tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
}

/// One open window under the worker's purview, controlled or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowClient {
    pub id: String,
    pub url: String,
    pub focused: bool,
    pub visibility_state: VisibilityState,
}

impl WindowClient {
    /// Focus alone is not enough: Safari on macOS reports the page focused
    /// while it sits in a hidden tab.
    pub fn needs_focus(&self) -> bool {
        !self.focused || self.visibility_state == VisibilityState::Hidden
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("client {0} is no longer available")]
    ClientGone(String),
    #[error("{0}")]
    Other(String),
}
