//! Home page and catalog fragment handlers.
//!
//! The home page renders the hero and a loading placeholder for the product
//! grid. `static/js/catalog.js` then requests `/catalog`, which performs the
//! one catalog fetch for this page view and replaces the placeholder with
//! either the grid or an error message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use astig_core::{Price, ProductId};

use super::Layout;
use crate::content::{CatalogSource, ImageUrlBuilder, Product};
use crate::filters;
use crate::state::AppState;

// =============================================================================
// Hero
// =============================================================================

/// Hero banner content.
#[derive(Clone)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub button_url: String,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            title: "YOUR SHOPPING VENTURES STARTS HERE".to_string(),
            subtitle: "Check out more products that suit your style".to_string(),
            button_text: "VIEW PRODUCTS".to_string(),
            button_url: "/search".to_string(),
        }
    }
}

// =============================================================================
// Product Tiles
// =============================================================================

/// Product display data for a grid tile.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductTile {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price_display: String,
    pub image_url: Option<String>,
    pub count_in_stock: u32,
    pub rating: Option<f64>,
    pub num_reviews: u32,
}

impl ProductTile {
    /// Build a tile, resolving the thumbnail URL.
    #[must_use]
    pub fn new(product: &Product, images: &ImageUrlBuilder) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.current.clone(),
            price_display: Price::from_amount(product.price).display(),
            image_url: product
                .image
                .as_ref()
                .and_then(|image| images.thumbnail(image)),
            count_in_stock: product.count_in_stock,
            rating: product.rating,
            num_reviews: product.num_reviews.unwrap_or(0),
        }
    }
}

// =============================================================================
// Catalog View-State
// =============================================================================

/// The product grid's view-state.
///
/// Rebuilt on every render and replaced wholesale when the fetch completes.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogView {
    /// Fetch not yet performed; show the loading indicator.
    Loading,
    /// Fetch succeeded.
    Loaded(Vec<ProductTile>),
    /// Fetch failed; show the message instead of the grid.
    Failed(String),
}

impl CatalogView {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Error message, if the fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Loaded tiles (empty while loading or after a failure).
    #[must_use]
    pub fn products(&self) -> &[ProductTile] {
        match self {
            Self::Loaded(products) => products,
            _ => &[],
        }
    }
}

/// Fetch the whole catalog once and turn the outcome into a view-state.
///
/// No retry: a failure becomes [`CatalogView::Failed`] with a readable message.
pub async fn load_catalog<S: CatalogSource>(source: &S, images: &ImageUrlBuilder) -> CatalogView {
    match source.fetch_products().await {
        Ok(products) => CatalogView::Loaded(
            products
                .iter()
                .map(|product| ProductTile::new(product, images))
                .collect(),
        ),
        Err(e) => {
            tracing::error!("Failed to fetch catalog: {e}");
            CatalogView::Failed(e.to_string())
        }
    }
}

// =============================================================================
// Templates & Handlers
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub hero: Hero,
    pub catalog: CatalogView,
    /// Where add-to-cart sends the shopper when stock runs out.
    pub return_to: String,
}

/// Catalog fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog.html")]
pub struct CatalogTemplate {
    pub catalog: CatalogView,
    pub return_to: String,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    HomeTemplate {
        layout: Layout::load(&state, &session).await,
        hero: Hero::default(),
        catalog: CatalogView::Loading,
        return_to: "/".to_string(),
    }
}

/// Catalog fragment: fetch the product list and render the grid.
#[instrument(skip(state))]
pub async fn catalog(State(state): State<AppState>) -> impl IntoResponse {
    let content = state.content();
    CatalogTemplate {
        catalog: load_catalog(content, content.images()).await,
        return_to: "/".to_string(),
    }
}
