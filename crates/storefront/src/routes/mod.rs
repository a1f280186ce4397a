//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (hero + catalog placeholder)
//! GET  /catalog                - Product grid fragment
//! GET  /search                 - Search by name, category and sort order
//!
//! # Products
//! GET  /product/{slug}         - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit (stock-checked, redirects)
//! POST /cart/update            - Set a line's quantity (stock-checked)
//! POST /cart/remove            - Remove a line
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # API
//! GET  /api/products/{id}      - Product document as JSON
//! ```

pub mod api;
pub mod cart;
pub mod home;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::models::{Notification, notification};
use crate::state::AppState;

// =============================================================================
// Layout
// =============================================================================

/// Data every full page renders in `base.html`.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub store_name: String,
    pub cart_count: u32,
    pub notifications: Vec<Notification>,
}

impl Layout {
    /// Build the layout for this request.
    ///
    /// Drains queued notifications, so each one is shown exactly once.
    pub async fn load(state: &AppState, session: &Session) -> Self {
        Self {
            store_name: state.config().store_name.clone(),
            cart_count: crate::cart::session::item_count(session).await,
            notifications: notification::drain(session).await,
        }
    }
}

/// Only same-site paths are accepted as redirect targets.
///
/// Browsers read `\` as `/` and drop tabs and newlines, so `/\host` and
/// `/\t/host` would leave the site; both are refused.
#[must_use]
pub fn safe_return_to(return_to: Option<&str>, fallback: &str) -> String {
    match return_to {
        Some(path) if is_local_path(path) => path.to_string(),
        _ => fallback.to_string(),
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}

// =============================================================================
// Routers
// =============================================================================

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/products/{id}", get(api::products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route("/catalog", get(home::catalog))
        .route("/search", get(search::search))
        // Product detail
        .route("/product/{slug}", get(products::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // JSON API
        .nest("/api", api_routes())
}
