use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use web_push::WebPushError;

use crate::config::VapidConfig;
use crate::ports;
use crate::types::push::PushSubscription;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimeProvider;

impl ports::TimeProvider for TokioTimeProvider {
    type Sleep<'a>
        = tokio::time::Sleep
    where
        Self: 'a;

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a> {
        tokio::time::sleep(duration)
    }
}

/// Signed, encrypted delivery through the browser vendor's push service.
#[derive(Clone)]
pub struct WebPushSender {
    vapid: VapidConfig,
    client: Arc<web_push::WebPushClient>,
}

impl WebPushSender {
    pub fn new(vapid: VapidConfig) -> Result<Self, WebPushError> {
        let client = web_push::WebPushClient::new()?;
        Ok(Self {
            vapid,
            client: Arc::new(client),
        })
    }
}

impl ports::PushSender for WebPushSender {
    type Error = WebPushError;
    type Fut<'a>
        = Pin<Box<dyn Future<Output = Result<(), Self::Error>> + Send + 'a>>
    where
        Self: 'a;

    fn send<'a>(&'a self, subscription: &'a PushSubscription, message: &'a str) -> Self::Fut<'a> {
        Box::pin(async move {
            let subscription_info = web_push::SubscriptionInfo::new(
                subscription.endpoint.clone(),
                subscription.keys.p256dh.clone(),
                subscription.keys.auth.clone(),
            );
            let mut builder = web_push::WebPushMessageBuilder::new(&subscription_info)?;
            builder.set_payload(web_push::ContentEncoding::Aes128Gcm, message.as_bytes());
            let mut signature_builder = web_push::VapidSignatureBuilder::from_base64(
                &self.vapid.private_key,
                web_push::URL_SAFE_NO_PAD,
                &subscription_info,
            )?;
            signature_builder.add_claim("sub", self.vapid.subject.as_str());
            builder.set_vapid_signature(signature_builder.build()?);
            self.client
                .send(builder.build()?)
                .await
                .inspect_err(|err| log_rejection(&subscription.endpoint, err))?;
            Ok(())
        })
    }
}

/// What a failed delivery says about the subscription it was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The push service dropped the endpoint; the browser has to subscribe again.
    SubscriptionGone,
    /// The VAPID signature was refused, typically a subscription made with another key pair.
    Unauthorized,
    PayloadTooLarge,
    Unavailable { retry_after: Option<Duration> },
    Other,
}

impl DeliveryFailure {
    pub fn classify(err: &WebPushError) -> Self {
        match err {
            WebPushError::EndpointNotValid | WebPushError::EndpointNotFound => {
                Self::SubscriptionGone
            }
            WebPushError::Unauthorized => Self::Unauthorized,
            WebPushError::PayloadTooLarge => Self::PayloadTooLarge,
            WebPushError::ServerError(retry_after) => Self::Unavailable {
                retry_after: *retry_after,
            },
            _ => Self::Other,
        }
    }
}

fn log_rejection(endpoint: &str, err: &WebPushError) {
    match DeliveryFailure::classify(err) {
        DeliveryFailure::SubscriptionGone => {
            tracing::warn!(endpoint, "subscription is gone, the page has to subscribe again")
        }
        DeliveryFailure::Unauthorized => {
            tracing::warn!(endpoint, "push service refused the VAPID signature")
        }
        DeliveryFailure::PayloadTooLarge => {
            tracing::warn!(endpoint, "payload exceeds the push service limit")
        }
        DeliveryFailure::Unavailable { retry_after } => tracing::warn!(
            endpoint,
            retry_after_secs = retry_after.map(|delay| delay.as_secs()),
            "push service unavailable"
        ),
        DeliveryFailure::Other => tracing::debug!(endpoint, "push service rejected the message: {err}"),
    }
}
