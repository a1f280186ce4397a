//! JSON API endpoints.

pub mod products;
