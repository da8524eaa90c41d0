use crate::state::AppState;
use crate::templates::ServiceWorkerTemplate;
use crate::worker;

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

const JAVASCRIPT: &str = "application/javascript";

fn asset(
    content_type: &'static str,
    cache_control: &'static str,
    body: impl IntoResponse,
) -> Response {
    (
        [(CONTENT_TYPE, content_type), (CACHE_CONTROL, cache_control)],
        body,
    )
        .into_response()
}

pub(crate) async fn manifest<T, S>(State(state): State<AppState<T, S>>) -> Response {
    asset(
        "application/manifest+json",
        "public, max-age=3600",
        state.manifest,
    )
}

pub(crate) async fn stylesheet() -> Response {
    const CSS_CONTENT: &str = include_str!("../static/style.css");
    asset("text/css", "public, max-age=3600", CSS_CONTENT.to_string())
}

pub(crate) async fn push_subscribe_script() -> Response {
    const PUSH_SUBSCRIBE_JS: &str = include_str!("../static/features/push_subscribe.js");
    asset(JAVASCRIPT, "no-cache", PUSH_SUBSCRIBE_JS.to_string())
}

pub(crate) async fn sw_register_script() -> Response {
    const SW_REGISTER_JS: &str = include_str!("../static/features/sw_register.js");
    asset(JAVASCRIPT, "no-cache", SW_REGISTER_JS.to_string())
}

const ICONS: &[(&str, &[u8])] = &[
    (
        "apple-touch-icon.png",
        include_bytes!("../static/icons/apple-touch-icon.png"),
    ),
    ("icon-192.png", include_bytes!("../static/icons/icon-192.png")),
    ("icon-512.png", include_bytes!("../static/icons/icon-512.png")),
];

/// Home screen icons; iOS only offers push to installed apps.
pub(crate) async fn icon(Path(name): Path<String>) -> Response {
    match ICONS.iter().find(|(file, _)| *file == name) {
        Some((_, bytes)) => asset("image/png", "public, max-age=86400", *bytes),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// The worker script shares its constants with [`crate::worker`].
pub(crate) async fn service_worker() -> Response {
    let template = ServiceWorkerTemplate {
        notification_title: worker::NOTIFICATION_TITLE,
        target_route: worker::TARGET_ROUTE,
    };
    match template.render() {
        Ok(script) => asset(JAVASCRIPT, "no-cache", script),
        Err(err) => {
            tracing::error!("failed to render service worker: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
