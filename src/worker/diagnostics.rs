use crate::types::worker::WindowClient;

use std::fmt;

/// A soft invariant violation: logged, reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnexpectedNotificationCount {
        tag: String,
        expected: CountExpectation,
        actual: usize,
    },
    /// The navigation finished somewhere else than requested.
    UnexpectedUrl { expected: String, actual: String },
    /// The platform returned no client where one should have been focused.
    MissingFocusedClient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountExpectation {
    Empty,
    AtMostOne,
}

impl fmt::Display for CountExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountExpectation::Empty => f.write_str("exactly 0"),
            CountExpectation::AtMostOne => f.write_str("0 or 1"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnexpectedNotificationCount {
                tag,
                expected,
                actual,
            } => write!(
                f,
                "expected {expected} notifications with tag '{tag}', got {actual}"
            ),
            Diagnostic::UnexpectedUrl { expected, actual } => {
                write!(f, "expected to be focused on {expected}, got {actual}")
            }
            Diagnostic::MissingFocusedClient => {
                f.write_str("no client to check after focusing the page")
            }
        }
    }
}

/// More than one notification per tag means a platform bug or a concurrent push.
pub(crate) fn check_notification_count(
    tag: &str,
    actual: usize,
    expected: CountExpectation,
) -> Option<Diagnostic> {
    tracing::debug!(tag, count = actual, "notifications with tag");

    let ok = match expected {
        CountExpectation::Empty => actual == 0,
        CountExpectation::AtMostOne => actual <= 1,
    };
    if ok {
        return None;
    }
    let diagnostic = Diagnostic::UnexpectedNotificationCount {
        tag: tag.to_string(),
        expected,
        actual,
    };
    tracing::warn!("{diagnostic}");
    Some(diagnostic)
}

pub(crate) fn check_focused_url(client: Option<&WindowClient>, expected: &str) -> Option<Diagnostic> {
    let diagnostic = match client {
        None => Diagnostic::MissingFocusedClient,
        Some(client) if client.url != expected => Diagnostic::UnexpectedUrl {
            expected: expected.to_string(),
            actual: client.url.clone(),
        },
        Some(_) => return None,
    };
    tracing::warn!("{diagnostic}");
    Some(diagnostic)
}
