use crate::ports::{NotificationRegistry, WindowClients};
use crate::types::worker::{PlatformError, ShownNotification, WindowClient};
use crate::worker::diagnostics::{Diagnostic, check_focused_url};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An open window was reused; `refocused` tells whether it had to be focused.
    Reused { client: String, refocused: bool },
    /// No window was open, a new one was requested.
    Opened { client: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickReport {
    pub outcome: ClickOutcome,
    pub diagnostics: Vec<Diagnostic>,
}

/// Brings the user to `route` after a click on `notification`.
pub async fn open_notification<N, C>(
    notifications: &N,
    clients: &C,
    notification: &ShownNotification,
    route: &str,
) -> Result<ClickReport, PlatformError>
where
    N: NotificationRegistry,
    C: WindowClients,
{
    notifications.close(notification);

    let target = format!("{}{}", clients.origin(), route);
    let windows = clients.match_all().await?;
    tracing::debug!(count = windows.len(), "active clients");

    if let Some(client) = windows.into_iter().next() {
        tracing::debug!(
            client = %client.id,
            focused = client.focused,
            visibility = ?client.visibility_state,
            "checking client"
        );
        let refocused = client.needs_focus();
        let client = if refocused {
            tracing::info!(client = %client.id, "focusing the page as it is not focused or visible");
            clients.focus(&client).await?
        } else {
            client
        };

        tracing::info!(client = %client.id, route, "navigating to the page");
        let navigated = clients.navigate(&client, route).await?;
        let diagnostics = check_focused_url(navigated.as_ref(), &target)
            .into_iter()
            .collect();

        return Ok(ClickReport {
            outcome: ClickOutcome::Reused {
                client: client.id,
                refocused,
            },
            diagnostics,
        });
    }

    clients.claim().await?;
    let opened = clients.open_window(route).await?;

    // A PWA on iOS launched from a notification opens its start URL instead
    // of the requested one, so the new window may still need a navigation.
    let landed = clients.match_all().await?.into_iter().next();
    let landed = match landed {
        Some(client) if client.url != target => {
            tracing::info!(client = %client.id, url = %client.url, "navigating to the page after opening the app");
            settle(clients.navigate(&client, route).await?, client)
        }
        other => other,
    };
    let diagnostics = check_focused_url(landed.as_ref(), &target)
        .into_iter()
        .collect();

    Ok(ClickReport {
        outcome: ClickOutcome::Opened {
            client: opened.map(|client| client.id),
        },
        diagnostics,
    })
}

/// Keeps the last known client when the navigation did not report one.
fn settle(navigated: Option<WindowClient>, before: WindowClient) -> Option<WindowClient> {
    navigated.or(Some(before))
}
