//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use super::home::ProductTile;
use crate::content::{ImageUrlBuilder, Product};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Product detail display data for templates.
#[derive(Clone, Debug)]
pub struct ProductDetail {
    /// Grid data, reused for the add-to-cart form.
    pub tile: ProductTile,
    /// Full-size image.
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub in_stock: bool,
}

impl ProductDetail {
    #[must_use]
    pub fn new(product: &Product, images: &ImageUrlBuilder) -> Self {
        Self {
            tile: ProductTile::new(product, images),
            image_url: product.image.as_ref().and_then(|image| images.url(image)),
            category: product.category.clone(),
            brand: product.brand.clone(),
            description: product.description.clone(),
            in_stock: product.in_stock(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductDetail,
    pub return_to: String,
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let content = state.content();
    let product = content.get_product_by_slug(&slug).await?;

    Ok(ProductShowTemplate {
        layout: Layout::load(&state, &session).await,
        product: ProductDetail::new(&product, content.images()),
        return_to: format!("/product/{slug}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::home::tests::product;

    fn render(product: &Product) -> String {
        let images = ImageUrlBuilder::new("k3x7ab12", "production");
        ProductShowTemplate {
            layout: Layout::default(),
            product: ProductDetail::new(product, &images),
            return_to: "/product/oversized-tee".to_string(),
        }
        .render()
        .expect("product template renders")
    }

    #[test]
    fn test_detail_uses_full_size_image() {
        let images = ImageUrlBuilder::new("k3x7ab12", "production");
        let detail = ProductDetail::new(&product("tee1", "Oversized Tee"), &images);

        assert_eq!(
            detail.image_url.as_deref(),
            Some("https://cdn.sanity.io/images/k3x7ab12/production/tee1-600x800.jpg")
        );
        assert!(detail.in_stock);
    }

    #[test]
    fn test_in_stock_product_offers_add_to_cart() {
        let html = render(&product("tee1", "Oversized Tee"));

        assert!(html.contains(r#"action="/cart/add""#));
        assert!(html.contains(r#"name="return_to" value="/product/oversized-tee""#));
        assert!(html.contains("In Stock"));
    }

    #[test]
    fn test_sold_out_product_hides_add_to_cart() {
        let mut sold_out = product("tee1", "Oversized Tee");
        sold_out.count_in_stock = 0;

        let html = render(&sold_out);
        assert!(!html.contains(r#"action="/cart/add""#));
        assert!(html.contains("Out of Stock"));
    }
}
