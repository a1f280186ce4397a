//! Session-backed cart store.
//!
//! The cart lives in the shopper's session under [`keys::CART`] and is only
//! ever changed by dispatching a [`CartAction`].

use tower_sessions::Session;
use tracing::instrument;

use super::store::{CartAction, CartState};
use crate::models::session::keys;

/// Load the cart from the session (empty if none yet).
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load(session: &Session) -> Result<CartState, tower_sessions::session::Error> {
    Ok(session
        .get::<CartState>(keys::CART)
        .await?
        .unwrap_or_default())
}

/// Apply `action` to the session cart and persist the result.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
#[instrument(skip(session))]
pub async fn dispatch(
    session: &Session,
    action: CartAction,
) -> Result<CartState, tower_sessions::session::Error> {
    let cart = load(session).await?.reduce(action);
    session.insert(keys::CART, &cart).await?;
    Ok(cart)
}

/// Number of units in the session cart, or 0 if the session is unreadable.
pub async fn item_count(session: &Session) -> u32 {
    match load(session).await {
        Ok(cart) => cart.item_count(),
        Err(e) => {
            tracing::warn!("Failed to read cart from session: {e}");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use astig_core::ProductId;

    use super::*;
    use crate::cart::store::tests::item;

    fn session() -> Session {
        Session::new(None, Arc::new(crate::middleware::session_store()), None)
    }

    #[tokio::test]
    async fn test_load_empty_session() {
        let session = session();
        let cart = load(&session).await.expect("memory store is readable");
        assert!(cart.is_empty());
        assert_eq!(item_count(&session).await, 0);
    }

    #[tokio::test]
    async fn test_dispatch_persists() {
        let session = session();
        dispatch(&session, CartAction::AddItem(item("a", 2)))
            .await
            .expect("dispatch succeeds");
        dispatch(&session, CartAction::AddItem(item("b", 1)))
            .await
            .expect("dispatch succeeds");

        let cart = load(&session).await.expect("memory store is readable");
        assert_eq!(cart.items.len(), 2);
        assert_eq!(item_count(&session).await, 3);

        let cart = dispatch(&session, CartAction::RemoveItem(ProductId::new("a")))
            .await
            .expect("dispatch succeeds");
        assert_eq!(cart.item_count(), 1);
        assert_eq!(load(&session).await.expect("readable"), cart);
    }
}
