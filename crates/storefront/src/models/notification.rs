//! Flash notifications.
//!
//! Handlers queue a notification in the session before redirecting; the next
//! page that renders the layout drains the queue and shows it once.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    /// CSS modifier used by the layout (`notification-success`, ...).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Queue a notification for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn enqueue(
    session: &Session,
    notification: Notification,
) -> Result<(), tower_sessions::session::Error> {
    let mut queued = session
        .get::<Vec<Notification>>(keys::NOTIFICATIONS)
        .await?
        .unwrap_or_default();
    queued.push(notification);
    session.insert(keys::NOTIFICATIONS, queued).await
}

/// Take every queued notification, oldest first.
///
/// A session failure only costs the shopper their messages, so it is logged
/// rather than returned.
pub async fn drain(session: &Session) -> Vec<Notification> {
    match session.remove::<Vec<Notification>>(keys::NOTIFICATIONS).await {
        Ok(queued) => queued.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read notifications from session: {e}");
            Vec::new()
        }
    }
}
