use crate::config;
use crate::ports::{PushSender, TimeProvider};
use crate::state::AppState;
use crate::subscription::{NotificationDraft, SubscriptionControls};
use crate::templates;

use axum::extract::State;

pub(crate) async fn index<T, S>(State(state): State<AppState<T, S>>) -> templates::IndexTemplate
where
    T: TimeProvider,
    S: PushSender,
{
    templates::IndexTemplate {
        app_name: state.config.app_name,
        description: config::APP_DESCRIPTION,
        draft: NotificationDraft::default(),
        controls: SubscriptionControls::for_subscription(None),
    }
}

pub(crate) async fn hi<T, S>(State(state): State<AppState<T, S>>) -> templates::HiTemplate
where
    T: TimeProvider,
    S: PushSender,
{
    templates::HiTemplate {
        app_name: state.config.app_name,
        description: config::APP_DESCRIPTION,
    }
}
