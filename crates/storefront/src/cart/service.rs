//! Add-to-cart and quantity changes, guarded by a live stock check.
//!
//! Both operations are pure with respect to the cart: they only compute the
//! line that should be dispatched. Callers decide whether to dispatch it.
//!
//! Lines are always built from the live product document. Nothing the
//! shopper posts besides the product ID and the quantity reaches the cart.

use astig_core::ProductId;
use thiserror::Error;
use tracing::instrument;

use super::store::{CartItem, CartState};
use crate::content::{ContentError, ImageUrlBuilder, Product, StockLookup};

/// Result of asking for a quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum StockCheck {
    /// Enough stock; dispatch this line.
    Available(CartItem),
    /// Not enough stock; the cart must stay as it is.
    OutOfStock {
        requested: u32,
        available: u32,
    },
}

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The stock lookup failed.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// The line being changed is not in the cart.
    #[error("Item not in cart: {0}")]
    NotInCart(ProductId),

    /// Quantities start at 1.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

/// Add one unit of the product `id`.
///
/// The requested quantity is the existing line's quantity plus one, or 1 for
/// a product not yet in the cart.
///
/// # Errors
///
/// Returns an error if the stock lookup fails.
#[instrument(skip(cart, stock, images), fields(product_id = %id))]
pub async fn add_to_cart<S: StockLookup>(
    cart: &CartState,
    id: &ProductId,
    stock: &S,
    images: &ImageUrlBuilder,
) -> Result<StockCheck, CartError> {
    let quantity = cart
        .find(id)
        .map_or(1, |line| line.quantity.saturating_add(1));

    check_stock(id, quantity, stock, images).await
}

/// Set the quantity of a line already in the cart.
///
/// The line is refreshed from the live document, so a price change in the
/// backend shows up on the next quantity change.
///
/// # Errors
///
/// Returns an error if the quantity is zero, the line is missing, or the
/// stock lookup fails.
#[instrument(skip(cart, stock, images), fields(product_id = %key))]
pub async fn update_quantity<S: StockLookup>(
    cart: &CartState,
    key: &ProductId,
    quantity: u32,
    stock: &S,
    images: &ImageUrlBuilder,
) -> Result<StockCheck, CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity);
    }

    if cart.find(key).is_none() {
        return Err(CartError::NotInCart(key.clone()));
    }

    check_stock(key, quantity, stock, images).await
}

/// Compare `quantity` against the authoritative stock count and build the
/// line from the same document.
async fn check_stock<S: StockLookup>(
    id: &ProductId,
    quantity: u32,
    stock: &S,
    images: &ImageUrlBuilder,
) -> Result<StockCheck, CartError> {
    let product = stock.live_product(id).await?;
    let available = product.count_in_stock;

    if available < quantity {
        tracing::info!(requested = quantity, available, "Insufficient stock");
        return Ok(StockCheck::OutOfStock {
            requested: quantity,
            available,
        });
    }

    Ok(StockCheck::Available(cart_line(
        id.clone(),
        &product,
        images,
        quantity,
    )))
}

/// Denormalize a product document into a cart line.
fn cart_line(
    key: ProductId,
    product: &Product,
    images: &ImageUrlBuilder,
    quantity: u32,
) -> CartItem {
    CartItem {
        key,
        name: product.name.clone(),
        count_in_stock: product.count_in_stock,
        slug: product.slug.current.clone(),
        price: product.price,
        image: product
            .image
            .as_ref()
            .and_then(|image| images.thumbnail(image)),
        quantity,
    }
}
