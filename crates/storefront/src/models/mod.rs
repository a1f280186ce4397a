//! Domain models for storefront.
//!
//! - [`session`] - session keys
//! - [`notification`] - flash messages shown on the next rendered page

pub mod notification;
pub mod session;

pub use notification::{Notification, Severity};
