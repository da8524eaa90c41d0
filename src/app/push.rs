use crate::ports::{PushSender, TimeProvider};
use crate::state::AppState;
use crate::subscription;
use crate::types::push::{PushSubscription, SendRequest};

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

const NOT_CONFIGURED: &str = "Push notifications are not configured.";

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SendResponse {
    pub(crate) success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl SendResponse {
    fn reply(status: StatusCode, success: bool, error: Option<&str>) -> Response {
        let body = SendResponse {
            success,
            error: error.map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /api/send`: forwards one notification to one subscription.
///
/// Credentials are checked before the body is looked at.
pub(crate) async fn send_notification<T, S>(
    State(state): State<AppState<T, S>>,
    request: Result<Json<SendRequest>, JsonRejection>,
) -> Response
where
    T: TimeProvider,
    S: PushSender,
{
    let Some(dispatcher) = state.dispatcher.as_ref() else {
        tracing::error!("push send rejected: {NOT_CONFIGURED}");
        return SendResponse::reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            false,
            Some(NOT_CONFIGURED),
        );
    };
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            tracing::warn!("push send rejected: {rejection}");
            return rejection.into_response();
        }
    };

    tracing::info!(
        tag = %request.payload.tag,
        delayed = request.is_delayed,
        force_close = request.payload.force_close,
        show_if_focused = request.payload.show_if_focused,
        "sending push"
    );
    match dispatcher.dispatch(&request).await {
        Ok(()) => SendResponse::reply(StatusCode::OK, true, None),
        Err(err) => {
            tracing::error!(endpoint = %request.subscription.endpoint, "push send failed: {err}");
            SendResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, false, None)
        }
    }
}

#[derive(Serialize)]
pub(crate) struct PublicKeyResponse {
    #[serde(rename = "publicKey")]
    pub(crate) public_key: String,
}

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: &'static str,
}

pub(crate) async fn push_public_key<T, S>(
    State(state): State<AppState<T, S>>,
) -> Result<Json<PublicKeyResponse>, (StatusCode, Json<ErrorResponse>)>
where
    T: TimeProvider,
    S: PushSender,
{
    let Some(vapid) = state.config.vapid.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: NOT_CONFIGURED,
            }),
        ));
    };

    Ok(Json(PublicKeyResponse {
        public_key: vapid.public_key.clone(),
    }))
}

#[derive(Serialize)]
pub(crate) struct SubscriptionCheckResponse {
    pub(crate) usable: bool,
}

/// `POST /api/subscription/check`: whether the page should keep its subscription.
pub(crate) async fn subscription_check<T, S>(
    State(state): State<AppState<T, S>>,
    Json(subscription): Json<PushSubscription>,
) -> Json<SubscriptionCheckResponse>
where
    T: TimeProvider,
    S: PushSender,
{
    let usable = subscription::is_usable(&subscription, state.time.now());
    if !usable {
        tracing::info!(endpoint = %subscription.endpoint, "discarding subscription close to expiry");
    }
    Json(SubscriptionCheckResponse { usable })
}
