//! Session-related types.
//!
//! Keys under which per-shopper state is stored in the session.

/// Session keys for storefront data.
pub mod keys {
    /// Key for the shopper's cart (`CartState`).
    pub const CART: &str = "cart";

    /// Key for notifications waiting to be shown on the next page.
    pub const NOTIFICATIONS: &str = "notifications";
}
