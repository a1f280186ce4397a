//! Cart route handlers.
//!
//! The cart lives in the session. Every change goes through a live stock
//! check against the content backend and ends in a redirect, with the outcome
//! queued as a notification for the next page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use astig_core::ProductId;

use super::{Layout, safe_return_to};
use crate::cart::session as cart_session;
use crate::cart::{
    CartAction, CartItem, CartState, StockCheck, add_to_cart, update_quantity,
};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{Notification, notification};
use crate::state::AppState;

/// Shown when the live stock count cannot cover the requested quantity.
pub const OUT_OF_STOCK_MESSAGE: &str = "Sorry. Product is out of stock";

/// Largest quantity offered in a line's quantity selector.
const MAX_QUANTITY_OPTIONS: u32 = 20;

// =============================================================================
// Views
// =============================================================================

/// One entry of a quantity selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantityOption {
    pub value: u32,
    pub selected: bool,
}

/// Cart line display data for templates.
#[derive(Clone, Debug)]
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub quantity_options: Vec<QuantityOption>,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        let upper = item
            .count_in_stock
            .clamp(1, MAX_QUANTITY_OPTIONS)
            .max(item.quantity);

        Self {
            id: item.key.clone(),
            name: item.name.clone(),
            slug: item.slug.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price().display(),
            line_price: item.line_price().display(),
            quantity_options: (1..=upper)
                .map(|value| QuantityOption {
                    value,
                    selected: value == item.quantity,
                })
                .collect(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone, Debug)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        Self {
            lines: cart.items.iter().map(CartLineView::from).collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
///
/// Only the product ID is taken from the shopper. Any other posted field is
/// ignored; the line is built from the live document.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = cart_session::load(&session).await?;

    Ok(CartShowTemplate {
        layout: Layout::load(&state, &session).await,
        cart: CartView::from(&cart),
    })
}

/// Add one unit of a product to the cart.
///
/// On success the shopper lands on `/cart`; when stock is short the cart is
/// left alone and the shopper goes back to `return_to`.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let return_to = safe_return_to(form.return_to.as_deref(), "/");

    add_breadcrumb(
        "cart",
        "Add to cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    let cart = cart_session::load(&session).await?;
    let content = state.content();

    match add_to_cart(&cart, &form.product_id, content, content.images()).await? {
        StockCheck::Available(item) => {
            let message = format!("{} added to the cart", item.name);
            cart_session::dispatch(&session, CartAction::AddItem(item)).await?;
            notification::enqueue(&session, Notification::success(message)).await?;
            Ok(Redirect::to("/cart").into_response())
        }
        StockCheck::OutOfStock { .. } => {
            notification::enqueue(&session, Notification::error(OUT_OF_STOCK_MESSAGE)).await?;
            Ok(Redirect::to(&return_to).into_response())
        }
    }
}

/// Set the quantity of a cart line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    add_breadcrumb(
        "cart",
        "Update quantity",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    let cart = cart_session::load(&session).await?;
    let content = state.content();

    match update_quantity(
        &cart,
        &form.product_id,
        form.quantity,
        content,
        content.images(),
    )
    .await?
    {
        StockCheck::Available(item) => {
            cart_session::dispatch(&session, CartAction::AddItem(item)).await?;
        }
        StockCheck::OutOfStock { .. } => {
            notification::enqueue(&session, Notification::error(OUT_OF_STOCK_MESSAGE)).await?;
        }
    }

    Ok(Redirect::to("/cart").into_response())
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    add_breadcrumb(
        "cart",
        "Remove from cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    cart_session::dispatch(&session, CartAction::RemoveItem(form.product_id)).await?;

    Ok(Redirect::to("/cart").into_response())
}

/// Get cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: cart_session::item_count(&session).await,
    }
}
