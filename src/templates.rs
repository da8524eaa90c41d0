use crate::subscription::{NotificationDraft, SubscriptionControls};

use askama::Template;
use askama_web::WebTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub(crate) struct IndexTemplate {
    pub(crate) app_name: String,
    pub(crate) description: &'static str,
    pub(crate) draft: NotificationDraft,
    pub(crate) controls: SubscriptionControls,
}

#[derive(Template, WebTemplate)]
#[template(path = "hi.html")]
pub(crate) struct HiTemplate {
    pub(crate) app_name: String,
    pub(crate) description: &'static str,
}

#[derive(Template)]
#[template(path = "sw.js", escape = "none")]
pub(crate) struct ServiceWorkerTemplate {
    pub(crate) notification_title: &'static str,
    pub(crate) target_route: &'static str,
}
