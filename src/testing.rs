use crate::ports;
use crate::types::push::{NotificationPayload, PushSubscription, SendRequest, SubscriptionKeys};

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::oneshot;

pub(crate) const NOW: &str = "2025-01-12T09:30:00Z";

pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::parse(NOW, &Rfc3339).expect("parse now")
}

#[derive(Clone)]
pub(crate) struct TestTime {
    now: OffsetDateTime,
    sleeps: Arc<Mutex<Vec<oneshot::Sender<()>>>>,
    durations: Arc<Mutex<Vec<Duration>>>,
}

impl TestTime {
    pub(crate) fn new() -> Self {
        Self::at(now())
    }

    pub(crate) fn at(now: OffsetDateTime) -> Self {
        Self {
            now,
            sleeps: Arc::new(Mutex::new(Vec::new())),
            durations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn sleep_durations(&self) -> Vec<Duration> {
        self.durations.lock().expect("durations lock").clone()
    }

    pub(crate) fn trigger_all(&self) {
        let mut sends = self.sleeps.lock().expect("sleeps lock");
        for sender in sends.drain(..) {
            let _ = sender.send(());
        }
    }
}

pub(crate) struct ManualSleep {
    receiver: oneshot::Receiver<()>,
}

impl Future for ManualSleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl ports::TimeProvider for TestTime {
    type Sleep<'a>
        = ManualSleep
    where
        Self: 'a;

    fn now(&self) -> OffsetDateTime {
        self.now
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a> {
        let (sender, receiver) = oneshot::channel();
        self.durations
            .lock()
            .expect("durations lock")
            .push(duration);
        self.sleeps.lock().expect("sleeps lock").push(sender);
        ManualSleep { receiver }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("test send error")]
pub(crate) struct TestSendError;

#[derive(Clone, Default)]
pub(crate) struct TestSender {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl TestSender {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("sent lock").clone()
    }
}

impl ports::PushSender for TestSender {
    type Error = TestSendError;
    type Fut<'a>
        = std::future::Ready<Result<(), Self::Error>>
    where
        Self: 'a;

    fn send<'a>(&'a self, subscription: &'a PushSubscription, message: &'a str) -> Self::Fut<'a> {
        self.sent
            .lock()
            .expect("sent lock")
            .push((subscription.endpoint.clone(), message.to_string()));
        if self.fail {
            std::future::ready(Err(TestSendError))
        } else {
            std::future::ready(Ok(()))
        }
    }
}

pub(crate) fn subscription() -> PushSubscription {
    PushSubscription {
        endpoint: "https://push.example/123".to_string(),
        expiration_time: None,
        keys: SubscriptionKeys {
            p256dh: "p256".to_string(),
            auth: "auth".to_string(),
        },
    }
}

pub(crate) fn send_request(is_delayed: bool) -> SendRequest {
    SendRequest {
        subscription: subscription(),
        is_delayed,
        payload: NotificationPayload {
            body: "Hello world!".to_string(),
            tag: "hello".to_string(),
            force_close: false,
            show_if_focused: false,
        },
    }
}
