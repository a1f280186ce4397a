//! Shopping cart.
//!
//! - [`store`] - cart state and the action reducer
//! - [`session`] - loading and dispatching against the shopper's session
//! - [`service`] - stock-checked add-to-cart and quantity changes

pub mod service;
pub mod session;
pub mod store;

pub use service::{CartError, StockCheck, add_to_cart, update_quantity};
pub use store::{CartAction, CartItem, CartState};
