use crate::adapters::{TokioTimeProvider, WebPushSender};
use crate::config::VapidConfig;
use crate::ports::{PushSender, TimeProvider};
use crate::types::push::SendRequest;

pub(crate) mod vapid;

use std::time::Duration;

pub use vapid::{VapidCredentials, generate_vapid_credentials, load_vapid_config};

/// How long a delayed send waits, leaving time to switch away from the page.
pub const DELAYED_DELIVERY: Duration = Duration::from_millis(5000);

#[derive(Debug, thiserror::Error)]
pub enum DispatchError<E: std::error::Error + 'static> {
    #[error("failed to encode push payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("push delivery failed: {0}")]
    Delivery(#[source] E),
}

#[derive(Debug, Clone)]
pub struct PushDispatcher<T, S> {
    time: T,
    sender: S,
}

impl<T, S> PushDispatcher<T, S>
where
    T: TimeProvider,
    S: PushSender,
{
    pub fn new(time: T, sender: S) -> Self {
        Self { time, sender }
    }

    /// Sends `request.payload` as JSON to `request.subscription`.
    ///
    /// A delayed request always sleeps the full [`DELAYED_DELIVERY`] before the
    /// sender is called; there is no cancellation and no retry.
    pub async fn dispatch(&self, request: &SendRequest) -> Result<(), DispatchError<S::Error>> {
        if request.is_delayed {
            tracing::debug!(delay_ms = DELAYED_DELIVERY.as_millis() as u64, "delaying push");
            self.time.sleep(DELAYED_DELIVERY).await;
        }

        let message = serde_json::to_string(&request.payload)?;
        self.sender
            .send(&request.subscription, &message)
            .await
            .map_err(DispatchError::Delivery)?;

        tracing::info!(
            tag = %request.payload.tag,
            endpoint = %request.subscription.endpoint,
            "push delivered"
        );
        Ok(())
    }
}

/// Builds the production dispatcher, or `None` when push is unavailable.
pub fn build_dispatcher(
    vapid: Option<&VapidConfig>,
) -> Option<PushDispatcher<TokioTimeProvider, WebPushSender>> {
    let Some(vapid) = vapid else {
        tracing::warn!("push notifications disabled: no VAPID configuration");
        return None;
    };

    match WebPushSender::new(vapid.clone()) {
        Ok(sender) => Some(PushDispatcher::new(TokioTimeProvider, sender)),
        Err(err) => {
            tracing::error!("push notifications disabled: failed to init web-push ({err})");
            None
        }
    }
}
