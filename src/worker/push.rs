use crate::ports::{NotificationRegistry, WindowClients};
use crate::types::push::NotificationPayload;
use crate::types::worker::{NotificationOptions, PlatformError};
use crate::worker::NOTIFICATION_TITLE;
use crate::worker::diagnostics::{CountExpectation, Diagnostic, check_notification_count};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Shown,
    /// A window was focused and the payload did not ask to show anyway.
    Suppressed { focused_client: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    pub outcome: PushOutcome,
    pub diagnostics: Vec<Diagnostic>,
}

/// Reconciles the notification store with an incoming push.
///
/// The suppressed path ends the push event without a notification. WebKit
/// counts those and drops the subscription after a few of them; the branch is
/// kept so a focused page is not interrupted.
pub async fn receive_push<N, C>(
    notifications: &N,
    clients: &C,
    payload: &NotificationPayload,
) -> Result<PushReport, PlatformError>
where
    N: NotificationRegistry,
    C: WindowClients,
{
    let tag = payload.tag.as_str();
    let mut diagnostics = Vec::new();

    if !payload.show_if_focused {
        let windows = clients.match_all().await?;
        tracing::debug!(count = windows.len(), "active clients");
        for client in &windows {
            tracing::debug!(
                client = %client.id,
                focused = client.focused,
                visibility = ?client.visibility_state,
                "checking client"
            );
            if client.focused {
                tracing::info!(
                    client = %client.id,
                    tag,
                    "page is focused, not showing a notification"
                );
                return Ok(PushReport {
                    outcome: PushOutcome::Suppressed {
                        focused_client: client.id.clone(),
                    },
                    diagnostics,
                });
            }
        }
    }

    // WebKit does not replace a notification that has the same tag. Closing
    // it removes it from `getNotifications` but not from the notification
    // center.
    let existing = notifications.get_notifications(tag).await?;
    diagnostics.extend(check_notification_count(
        tag,
        existing.len(),
        CountExpectation::AtMostOne,
    ));

    if payload.force_close {
        for notification in &existing {
            notifications.close(notification);
        }
        let remaining = notifications.get_notifications(tag).await?;
        diagnostics.extend(check_notification_count(
            tag,
            remaining.len(),
            CountExpectation::Empty,
        ));
    }

    let options = NotificationOptions {
        body: payload.body.clone(),
        tag: payload.tag.clone(),
    };
    notifications
        .show_notification(NOTIFICATION_TITLE, &options)
        .await?;

    Ok(PushReport {
        outcome: PushOutcome::Shown,
        diagnostics,
    })
}
