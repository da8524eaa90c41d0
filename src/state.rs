use crate::config::{self, AppConfig};
use crate::push::PushDispatcher;

#[derive(Clone)]
pub struct AppState<T, S> {
    pub config: AppConfig,
    pub time: T,
    /// `None` when the server runs without usable push credentials.
    pub dispatcher: Option<PushDispatcher<T, S>>,
    pub manifest: String,
}

impl<T, S> AppState<T, S> {
    pub fn new(config: AppConfig, time: T, dispatcher: Option<PushDispatcher<T, S>>) -> Self {
        let manifest = render_manifest(&config.app_name);
        Self {
            config,
            time,
            dispatcher,
            manifest,
        }
    }
}

fn render_manifest(app_name: &str) -> String {
    serde_json::json!({
        "name": app_name,
        "short_name": app_name,
        "description": config::APP_DESCRIPTION,
        "start_url": "/",
        "scope": "/",
        "display": "standalone",
        "background_color": "#ffffff",
        "theme_color": "#1d4ed8",
        "icons": [
            { "src": "/static/icons/icon-192.png", "sizes": "192x192", "type": "image/png" },
            { "src": "/static/icons/icon-512.png", "sizes": "512x512", "type": "image/png" },
        ],
    })
    .to_string()
}
