//! An in-process stand-in for the browser's notification store and client list.
//!
//! Every async port call yields to the scheduler before it touches the state
//! and takes the lock once, so concurrent events interleave between calls the
//! way they do in a browser. [`Quirks`] reproduce the inconsistencies the
//! worker has to live with.

use crate::ports::{NotificationRegistry, PlatformFuture, WindowClients};
use crate::types::worker::{
    NotificationId, NotificationOptions, PlatformError, ShownNotification, VisibilityState,
    WindowClient,
};

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quirks {
    /// Showing a notification replaces one with the same tag.
    pub replaces_by_tag: bool,
    /// `close()` only shows up after the next `getNotifications()` has answered.
    pub deferred_close: bool,
    /// `openWindow()` lands on this path instead of the requested one.
    pub start_url: Option<String>,
    /// `navigate()` resolves without the navigated client.
    pub detached_navigation: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            replaces_by_tag: true,
            deferred_close: false,
            start_url: None,
            detached_navigation: false,
        }
    }
}

impl Quirks {
    /// Safari: no tag replacement (https://bugs.webkit.org/show_bug.cgi?id=258922).
    pub fn webkit() -> Self {
        Self {
            replaces_by_tag: false,
            ..Self::default()
        }
    }

    /// Home screen app on iOS, launched cold from a notification.
    pub fn ios_pwa() -> Self {
        Self {
            start_url: Some("/".to_string()),
            ..Self::webkit()
        }
    }
}

/// A port call as recorded by [`InMemoryPlatform::calls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformCall {
    GetNotifications,
    ShowNotification,
    Close,
    MatchAll,
    Focus,
    Navigate,
    OpenWindow,
    Claim,
}

#[derive(Debug, Default)]
struct PlatformState {
    next_notification: u64,
    next_client: u64,
    notifications: Vec<ShownNotification>,
    pending_close: Vec<NotificationId>,
    shown_history: Vec<ShownNotification>,
    clients: Vec<WindowClient>,
    calls: Vec<PlatformCall>,
}

impl PlatformState {
    fn new_notification(&mut self, title: &str, body: &str, tag: &str) -> ShownNotification {
        self.next_notification += 1;
        ShownNotification {
            id: NotificationId(self.next_notification),
            title: title.to_string(),
            body: body.to_string(),
            tag: tag.to_string(),
        }
    }

    fn new_client(&mut self, url: String, focused: bool, visibility_state: VisibilityState) -> WindowClient {
        self.next_client += 1;
        let client = WindowClient {
            id: format!("client-{}", self.next_client),
            url,
            focused,
            visibility_state,
        };
        self.clients.push(client.clone());
        client
    }

    fn client_mut(&mut self, id: &str) -> Result<&mut WindowClient, PlatformError> {
        self.clients
            .iter_mut()
            .find(|client| client.id == id)
            .ok_or_else(|| PlatformError::ClientGone(id.to_string()))
    }

    fn remove_notifications(&mut self, ids: &[NotificationId]) {
        self.notifications
            .retain(|notification| !ids.contains(&notification.id));
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryPlatform {
    origin: Arc<str>,
    quirks: Arc<Quirks>,
    state: Arc<Mutex<PlatformState>>,
}

impl InMemoryPlatform {
    pub fn new(origin: &str) -> Self {
        Self::with_quirks(origin, Quirks::default())
    }

    pub fn with_quirks(origin: &str, quirks: Quirks) -> Self {
        Self {
            origin: Arc::from(origin.trim_end_matches('/')),
            quirks: Arc::new(quirks),
            state: Arc::new(Mutex::new(PlatformState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlatformState> {
        // Poisoned only if another event panicked mid-call; the state is still whole.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resolves a path against the origin; absolute URLs pass through.
    pub fn resolve(&self, url: &str) -> String {
        if url.contains("://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.origin)
        } else {
            format!("{}/{url}", self.origin)
        }
    }

    pub fn add_client(&self, path: &str, focused: bool, visibility_state: VisibilityState) -> WindowClient {
        let url = self.resolve(path);
        let mut state = self.lock();
        if focused {
            for client in &mut state.clients {
                client.focused = false;
            }
        }
        state.new_client(url, focused, visibility_state)
    }

    pub fn close_client(&self, id: &str) {
        self.lock().clients.retain(|client| client.id != id);
    }

    /// Places a notification as if an earlier push had shown it.
    pub fn seed_notification(&self, tag: &str, body: &str) -> ShownNotification {
        let mut state = self.lock();
        let notification = state.new_notification(crate::worker::NOTIFICATION_TITLE, body, tag);
        state.notifications.push(notification.clone());
        notification
    }

    pub fn notifications(&self) -> Vec<ShownNotification> {
        self.lock().notifications.clone()
    }

    /// Every notification shown through the port, in order.
    pub fn shown_history(&self) -> Vec<ShownNotification> {
        self.lock().shown_history.clone()
    }

    pub fn clients(&self) -> Vec<WindowClient> {
        self.lock().clients.clone()
    }

    pub fn client(&self, id: &str) -> Option<WindowClient> {
        self.lock().clients.iter().find(|client| client.id == id).cloned()
    }

    /// Port calls in the order they reached the platform.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, call: PlatformCall) -> usize {
        self.lock().calls.iter().filter(|made| **made == call).count()
    }

    /// Locks the state after giving concurrent events a chance to run.
    async fn enter(&self, call: PlatformCall) -> MutexGuard<'_, PlatformState> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.calls.push(call);
        state
    }
}

impl NotificationRegistry for InMemoryPlatform {
    fn get_notifications<'a>(&'a self, tag: &'a str) -> PlatformFuture<'a, Vec<ShownNotification>> {
        Box::pin(async move {
            let mut state = self.enter(PlatformCall::GetNotifications).await;
            let found: Vec<ShownNotification> = state
                .notifications
                .iter()
                .filter(|notification| notification.tag == tag)
                .cloned()
                .collect();
            let pending = std::mem::take(&mut state.pending_close);
            state.remove_notifications(&pending);
            Ok(found)
        })
    }

    fn show_notification<'a>(
        &'a self,
        title: &'a str,
        options: &'a NotificationOptions,
    ) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.enter(PlatformCall::ShowNotification).await;
            if self.quirks.replaces_by_tag {
                state
                    .notifications
                    .retain(|notification| notification.tag != options.tag);
            }
            let notification = state.new_notification(title, &options.body, &options.tag);
            state.shown_history.push(notification.clone());
            state.notifications.push(notification);
            Ok(())
        })
    }

    fn close(&self, notification: &ShownNotification) {
        let mut state = self.lock();
        state.calls.push(PlatformCall::Close);
        if self.quirks.deferred_close {
            state.pending_close.push(notification.id);
        } else {
            state.remove_notifications(&[notification.id]);
        }
    }
}

impl WindowClients for InMemoryPlatform {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn match_all<'a>(&'a self) -> PlatformFuture<'a, Vec<WindowClient>> {
        Box::pin(async move { Ok(self.enter(PlatformCall::MatchAll).await.clients.clone()) })
    }

    fn focus<'a>(&'a self, client: &'a WindowClient) -> PlatformFuture<'a, WindowClient> {
        Box::pin(async move {
            let mut state = self.enter(PlatformCall::Focus).await;
            for other in &mut state.clients {
                other.focused = false;
            }
            let focused = state.client_mut(&client.id)?;
            focused.focused = true;
            focused.visibility_state = VisibilityState::Visible;
            Ok(focused.clone())
        })
    }

    fn navigate<'a>(
        &'a self,
        client: &'a WindowClient,
        url: &'a str,
    ) -> PlatformFuture<'a, Option<WindowClient>> {
        Box::pin(async move {
            let url = self.resolve(url);
            let mut state = self.enter(PlatformCall::Navigate).await;
            let navigated = state.client_mut(&client.id)?;
            navigated.url = url;
            let navigated = navigated.clone();
            if self.quirks.detached_navigation {
                Ok(None)
            } else {
                Ok(Some(navigated))
            }
        })
    }

    fn open_window<'a>(&'a self, url: &'a str) -> PlatformFuture<'a, Option<WindowClient>> {
        Box::pin(async move {
            let landing = match self.quirks.start_url.as_deref() {
                Some(start_url) => self.resolve(start_url),
                None => self.resolve(url),
            };
            let mut state = self.enter(PlatformCall::OpenWindow).await;
            for client in &mut state.clients {
                client.focused = false;
            }
            let client = state.new_client(landing, true, VisibilityState::Visible);
            Ok(Some(client))
        })
    }

    fn claim<'a>(&'a self) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            self.enter(PlatformCall::Claim).await;
            Ok(())
        })
    }
}
