//! Product JSON endpoint.
//!
//! Reads from the live (non-CDN) endpoint, so `countInStock` is current.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use astig_core::ProductId;

use crate::content::Product;
use crate::error::Result;
use crate::state::AppState;

/// Fetch one product document by ID.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Json<Product>> {
    let product = state.content().get_product(&id).await?;
    Ok(Json(product))
}
