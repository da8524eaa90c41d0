use crate::adapters::TokioTimeProvider;
use crate::assets;
use crate::config;
use crate::ports::{PushSender, TimeProvider};
use crate::push as push_service;
use crate::state::AppState;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};

mod pages;
mod push;

pub fn app(config: config::AppConfig) -> Router {
    let dispatcher = push_service::build_dispatcher(config.vapid.as_ref());
    router(AppState::new(config, TokioTimeProvider, dispatcher))
}

pub(crate) fn router<T, S>(state: AppState<T, S>) -> Router
where
    T: TimeProvider,
    S: PushSender,
{
    Router::new()
        .route("/", get(pages::index::<T, S>))
        .route("/hi", get(pages::hi::<T, S>))
        .route("/api/send", post(push::send_notification::<T, S>))
        .route("/api/push/public-key", get(push::push_public_key::<T, S>))
        .route(
            "/api/subscription/check",
            post(push::subscription_check::<T, S>),
        )
        .route("/sw.js", get(assets::service_worker))
        .route("/static/style.css", get(assets::stylesheet))
        .route(
            "/static/features/push_subscribe.js",
            get(assets::push_subscribe_script),
        )
        .route(
            "/static/features/sw_register.js",
            get(assets::sw_register_script),
        )
        .route("/static/manifest.json", get(assets::manifest::<T, S>))
        .route("/static/icons/{name}", get(assets::icon))
        .route("/health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(log_requests))
}

pub(crate) async fn health() -> &'static str {
    "ok"
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::debug!(%method, path, status = response.status().as_u16(), "request");
    response
}

#[cfg(test)]
#[allow(non_snake_case)]
pub(crate) mod tests {
    use super::*;
    use crate::push::PushDispatcher;
    use crate::testing::{self, TestSender, TestTime};
    use axum::body::{Body, to_bytes};
    use axum::http::StatusCode;
    use axum::http::header::CONTENT_TYPE;
    use serde_json::Value as JsonValue;
    use serde_json::from_slice as json_from_slice;
    use time::Duration;
    use tower::ServiceExt;

    pub(crate) fn test_router(sender: Option<TestSender>) -> Router {
        let time = TestTime::new();
        let dispatcher = sender.map(|sender| PushDispatcher::new(time.clone(), sender));
        router(AppState::new(config::AppConfig::default(), time, dispatcher))
    }

    fn json_request(uri: &str, body: &JsonValue) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(body.to_vec()).expect("utf8 body")
    }

    fn send_body(is_delayed: bool) -> JsonValue {
        serde_json::to_value(testing::send_request(is_delayed)).expect("request json")
    }

    #[tokio::test]
    async fn app__should_return_ok_on_health_endpoint() {
        // Given
        let app = app(config::AppConfig::default());

        // When
        let response = app.oneshot(get_request("/health")).await.expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn send_notification__should_return_success_after_delivery() {
        // Given
        let sender = TestSender::default();
        let app = test_router(Some(sender.clone()));

        // When
        let response = app
            .oneshot(json_request("/api/send", &send_body(false)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let payload: JsonValue = json_from_slice(body_string(response).await.as_bytes()).expect("json");
        assert_eq!(payload, serde_json::json!({ "success": true }));

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "https://push.example/123");
        let message: JsonValue = serde_json::from_str(&sent[0].1).expect("message json");
        assert_eq!(message["tag"], "hello");
        assert_eq!(message["showIfFocused"], false);
    }

    #[tokio::test]
    async fn send_notification__should_return_failure_when_delivery_fails() {
        // Given
        let sender = TestSender::failing();
        let app = test_router(Some(sender.clone()));

        // When
        let response = app
            .oneshot(json_request("/api/send", &send_body(false)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload: JsonValue = json_from_slice(body_string(response).await.as_bytes()).expect("json");
        assert_eq!(payload, serde_json::json!({ "success": false }));
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn send_notification__should_fail_before_parsing_without_credentials() {
        // Given
        let app = test_router(None);
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/send")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{"))
            .unwrap();

        // When
        let response = app.oneshot(request).await.expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload: JsonValue = json_from_slice(body_string(response).await.as_bytes()).expect("json");
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "Push notifications are not configured.");
    }

    #[tokio::test]
    async fn send_notification__should_reject_malformed_body() {
        // Given
        let sender = TestSender::default();
        let app = test_router(Some(sender.clone()));

        // When
        let response = app
            .oneshot(json_request("/api/send", &serde_json::json!({ "payload": {} })))
            .await
            .expect("request failed");

        // Then
        assert!(response.status().is_client_error());
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn push_public_key__should_return_unavailable_without_credentials() {
        // When
        let response = test_router(None)
            .oneshot(get_request("/api/push/public-key"))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn push_public_key__should_return_configured_key() {
        // Given
        let time = TestTime::new();
        let app_config = config::AppConfig {
            vapid: Some(config::VapidConfig {
                private_key: "private".to_string(),
                public_key: "BPublic".to_string(),
                subject: "mailto:push@example.com".to_string(),
            }),
            ..Default::default()
        };
        let app = router::<_, TestSender>(AppState::new(app_config, time, None));

        // When
        let response = app
            .oneshot(get_request("/api/push/public-key"))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let payload: JsonValue = json_from_slice(body_string(response).await.as_bytes()).expect("json");
        assert_eq!(payload["publicKey"], "BPublic");
    }

    #[tokio::test]
    async fn subscription_check__should_flag_subscription_about_to_expire() {
        // Given
        let mut subscription = testing::subscription();
        let expires = testing::now() + Duration::minutes(2);
        subscription.expiration_time = Some((expires.unix_timestamp_nanos() / 1_000_000) as f64);
        let body = serde_json::to_value(&subscription).expect("subscription json");

        // When
        let response = test_router(None)
            .oneshot(json_request("/api/subscription/check", &body))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let payload: JsonValue = json_from_slice(body_string(response).await.as_bytes()).expect("json");
        assert_eq!(payload, serde_json::json!({ "usable": false }));
    }

    #[tokio::test]
    async fn subscription_check__should_accept_browser_json_without_expiry() {
        // Given
        let body = serde_json::json!({
            "endpoint": "https://push.example/abc",
            "expirationTime": null,
            "keys": { "p256dh": "p256", "auth": "auth" },
        });

        // When
        let response = test_router(None)
            .oneshot(json_request("/api/subscription/check", &body))
            .await
            .expect("request failed");

        // Then
        let payload: JsonValue = json_from_slice(body_string(response).await.as_bytes()).expect("json");
        assert_eq!(payload["usable"], true);
    }

    #[tokio::test]
    async fn index__should_render_form_with_defaults() {
        // When
        let response = test_router(None)
            .oneshot(get_request("/"))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"value="Hello world!""#));
        assert!(html.contains(r#"value="hello""#));
        assert!(html.contains(r#"id="delay" checked"#));
        assert!(html.contains(r#"id="unsubscribe" disabled"#));
        assert!(html.contains(r#"id="send" disabled"#));
        assert!(html.contains("/static/features/push_subscribe.js"));
    }

    #[tokio::test]
    async fn hi__should_link_back_home() {
        // When
        let response = test_router(None)
            .oneshot(get_request("/hi"))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Hi!"));
        assert!(html.contains(r#"href="/""#));
    }

    #[tokio::test]
    async fn service_worker__should_embed_title_and_route() {
        // When
        let response = test_router(None)
            .oneshot(get_request("/sw.js"))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).expect("content type"),
            "application/javascript"
        );
        let script = body_string(response).await;
        assert!(script.contains(r#"const NOTIFICATION_TITLE = "New notification";"#));
        assert!(script.contains(r#"const TARGET_ROUTE = "/hi";"#));
    }

    #[tokio::test]
    async fn manifest__should_use_app_name() {
        // When
        let response = test_router(None)
            .oneshot(get_request("/static/manifest.json"))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let manifest: JsonValue = json_from_slice(body_string(response).await.as_bytes()).expect("json");
        assert_eq!(manifest["name"], "Web Push");
        assert_eq!(manifest["display"], "standalone");
    }

    #[tokio::test]
    async fn service_worker__should_claim_clients_before_opening_a_window() {
        // When
        let response = test_router(None)
            .oneshot(get_request("/sw.js"))
            .await
            .expect("request failed");

        // Then
        let script = body_string(response).await;
        let claim = script
            .find("await self.clients.claim();")
            .expect("claim call");
        let open = script
            .find("await self.clients.openWindow(TARGET_ROUTE);")
            .expect("openWindow call");
        assert!(claim < open);
    }

    #[tokio::test]
    async fn push_subscribe_script__should_keep_registration_when_check_fails() {
        // When
        let response = test_router(None)
            .oneshot(get_request("/static/features/push_subscribe.js"))
            .await
            .expect("request failed");

        // Then
        let script = body_string(response).await;
        let assigned = script.find("registration = reg;").expect("assignment");
        let check = script.find("/api/subscription/check").expect("check call");
        assert!(assigned < check);
        assert!(script.contains("catch (err)"));
    }

    #[tokio::test]
    async fn icon__should_serve_home_screen_icons() {
        // When
        let apple = test_router(None)
            .oneshot(get_request("/static/icons/apple-touch-icon.png"))
            .await
            .expect("request failed");
        let missing = test_router(None)
            .oneshot(get_request("/static/icons/favicon.svg"))
            .await
            .expect("request failed");

        // Then
        assert_eq!(apple.status(), StatusCode::OK);
        assert_eq!(
            apple.headers().get(CONTENT_TYPE).expect("content type"),
            "image/png"
        );
        let body = to_bytes(apple.into_body(), usize::MAX)
            .await
            .expect("read body");
        assert!(body.starts_with(b"\x89PNG"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn layout__should_link_icons_and_manifest_should_list_them() {
        // When
        let html = body_string(
            test_router(None)
                .oneshot(get_request("/"))
                .await
                .expect("request failed"),
        )
        .await;
        let manifest = body_string(
            test_router(None)
                .oneshot(get_request("/static/manifest.json"))
                .await
                .expect("request failed"),
        )
        .await;

        // Then
        assert!(html.contains(r#"rel="apple-touch-icon""#));
        let manifest: JsonValue = json_from_slice(manifest.as_bytes()).expect("json");
        assert_eq!(manifest["icons"][0]["src"], "/static/icons/icon-192.png");
        assert_eq!(manifest["icons"][1]["sizes"], "512x512");
    }
}
