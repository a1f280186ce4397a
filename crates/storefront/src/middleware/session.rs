//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions on a moka cache. Sessions
//! hold the shopper's cart and pending notifications, nothing that must
//! survive a restart. The cache drops a record once its expiry date passes
//! and evicts the least used records beyond [`SESSION_STORE_CAPACITY`].

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "astig_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Most sessions held at once.
pub const SESSION_STORE_CAPACITY: u64 = 100_000;

/// Bounded session store that evicts expired records.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(SESSION_STORE_CAPACITY))
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_store_keeps_live_sessions() {
        let store = session_store();
        let mut live = record(Duration::hours(1));
        store.create(&mut live).await.expect("create succeeds");

        let loaded = store.load(&live.id).await.expect("load succeeds");
        assert_eq!(loaded.map(|r| r.id), Some(live.id));
    }

    #[tokio::test]
    async fn test_store_evicts_expired_sessions() {
        let store = session_store();
        let mut stale = record(Duration::seconds(-1));
        store.create(&mut stale).await.expect("create succeeds");

        let loaded = store.load(&stale.id).await.expect("load succeeds");
        assert!(loaded.is_none());
    }
}
