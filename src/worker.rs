//! Push and notification-click handling for the service worker.
//!
//! Every event runs as its own task; the [`EventHandle`] it returns stands for
//! `event.waitUntil(...)` and must be awaited for the work to count as done.
//! Nothing is shared between events except what the platform stores.

pub mod click;
pub mod diagnostics;
pub mod memory;
pub mod push;

use crate::ports::{NotificationRegistry, WindowClients};
use crate::types::push::NotificationPayload;
use crate::types::worker::{PlatformError, ShownNotification};

use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

pub use click::{ClickOutcome, ClickReport, open_notification};
pub use diagnostics::{CountExpectation, Diagnostic};
pub use push::{PushOutcome, PushReport, receive_push};

pub const NOTIFICATION_TITLE: &str = "New notification";
/// Where a click on a notification takes the user.
pub const TARGET_ROUTE: &str = "/hi";

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("push event carried no data")]
    MissingData,
    #[error("invalid push payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("{event} handler did not complete: {reason}")]
    Terminated { event: &'static str, reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct PushEvent {
    data: Option<Vec<u8>>,
}

impl PushEvent {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }

    /// `event.data.json()`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, WorkerError> {
        let data = self.data.as_deref().ok_or(WorkerError::MissingData)?;
        Ok(serde_json::from_slice(data)?)
    }
}

#[derive(Debug, Clone)]
pub struct NotificationClickEvent {
    pub notification: ShownNotification,
}

pub struct EventHandle<R> {
    event: &'static str,
    handle: JoinHandle<Result<R, WorkerError>>,
}

impl<R> EventHandle<R> {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Resolves once everything the event triggered has completed.
    pub async fn wait_until(self) -> Result<R, WorkerError> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => Err(WorkerError::Terminated {
                event: self.event,
                reason: err.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceWorker<N, C> {
    notifications: N,
    clients: C,
    route: String,
}

impl<N, C> ServiceWorker<N, C>
where
    N: NotificationRegistry,
    C: WindowClients,
{
    pub fn new(notifications: N, clients: C) -> Self {
        Self {
            notifications,
            clients,
            route: TARGET_ROUTE.to_string(),
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    pub fn on_push(&self, event: PushEvent) -> EventHandle<PushReport> {
        let notifications = self.notifications.clone();
        let clients = self.clients.clone();
        let handle = tokio::spawn(async move {
            let payload: NotificationPayload = event
                .json()
                .inspect_err(|err| tracing::error!("push event rejected: {err}"))?;
            tracing::info!(tag = %payload.tag, body = %payload.body, "received push notification");
            receive_push(&notifications, &clients, &payload)
                .await
                .inspect_err(|err| tracing::error!(tag = %payload.tag, "push handling failed: {err}"))
                .map_err(WorkerError::from)
        });
        EventHandle {
            event: "push",
            handle,
        }
    }

    pub fn on_notification_click(&self, event: NotificationClickEvent) -> EventHandle<ClickReport> {
        let notifications = self.notifications.clone();
        let clients = self.clients.clone();
        let route = self.route.clone();
        let handle = tokio::spawn(async move {
            open_notification(&notifications, &clients, &event.notification, &route)
                .await
                .inspect_err(|err| tracing::error!("notification click handling failed: {err}"))
                .map_err(WorkerError::from)
        });
        EventHandle {
            event: "notificationclick",
            handle,
        }
    }
}
