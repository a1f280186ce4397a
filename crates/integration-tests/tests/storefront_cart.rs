//! Integration tests for add-to-cart, stock checks and notifications.

use astig_integration_tests::{TestContext, location, product_json};
use astig_storefront::content::queries;
use reqwest::StatusCode;

const ADDED: &str = "Oversized Tee added to the cart";
const OUT_OF_STOCK: &str = "Sorry. Product is out of stock";

fn tee() -> serde_json::Value {
    product_json("tee-1", "Oversized Tee", 25.0, 5)
}

#[tokio::test]
async fn test_add_new_product_redirects_to_cart() {
    let ctx = TestContext::start(vec![tee()]).await;

    let response = ctx.add_to_cart(&tee(), "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/cart"));

    let (status, body) = ctx.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(ADDED));
    assert!(body.contains(r#"<option value="1" selected>"#));
    assert!(body.contains("$25.00"));

    // One live stock read per add
    assert_eq!(ctx.backend.query_count(queries::PRODUCT_BY_ID), 1);
}

#[tokio::test]
async fn test_notification_is_shown_once() {
    let ctx = TestContext::start(vec![tee()]).await;
    ctx.add_to_cart(&tee(), "/").await;

    let (_, first) = ctx.get("/cart").await;
    assert!(first.contains(ADDED));

    let (_, second) = ctx.get("/cart").await;
    assert!(!second.contains(ADDED));
}

#[tokio::test]
async fn test_add_existing_product_increments_quantity() {
    let ctx = TestContext::start(vec![tee()]).await;

    ctx.add_to_cart(&tee(), "/").await;
    let response = ctx.add_to_cart(&tee(), "/").await;
    assert_eq!(location(&response), Some("/cart"));

    let (_, body) = ctx.get("/cart").await;
    assert!(body.contains(r#"<option value="2" selected>"#));
    assert!(body.contains("$50.00"));
    assert_eq!(ctx.backend.query_count(queries::PRODUCT_BY_ID), 2);

    let (_, count) = ctx.get("/cart/count").await;
    assert!(count.contains(">2<"));
}

#[tokio::test]
async fn test_out_of_stock_leaves_cart_untouched() {
    let ctx = TestContext::start(vec![tee()]).await;
    // Listing still says 5; live stock is gone
    ctx.backend.set_stock("tee-1", 0);

    let response = ctx.add_to_cart(&tee(), "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let (_, home) = ctx.get("/").await;
    assert!(home.contains(OUT_OF_STOCK));

    let (_, cart) = ctx.get("/cart").await;
    assert!(cart.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_repeat_add_beyond_stock_keeps_quantity() {
    let ctx = TestContext::start(vec![tee()]).await;
    ctx.backend.set_stock("tee-1", 1);

    let first = ctx.add_to_cart(&tee(), "/search").await;
    assert_eq!(location(&first), Some("/cart"));

    let second = ctx.add_to_cart(&tee(), "/search").await;
    assert_eq!(location(&second), Some("/search"));

    let (_, body) = ctx.get("/cart").await;
    assert!(body.contains(OUT_OF_STOCK));
    assert!(body.contains(r#"<option value="1" selected>"#));
}

#[tokio::test]
async fn test_offsite_return_to_is_ignored() {
    let ctx = TestContext::start(vec![tee()]).await;
    ctx.backend.set_stock("tee-1", 0);

    for target in ["//evil.example/", "/\\evil.example/", "https://evil.example/"] {
        let response = ctx.add_to_cart(&tee(), target).await;
        assert_eq!(location(&response), Some("/"), "return_to {target:?}");
    }
}

#[tokio::test]
async fn test_posted_product_fields_are_ignored() {
    let ctx = TestContext::start(vec![tee()]).await;

    let response = ctx
        .post_form(
            "/cart/add",
            &[
                ("product_id", "tee-1"),
                ("name", "Free Tee"),
                ("slug", "free-tee"),
                ("price", "0.01"),
                ("image", "https://evil.example/tee.jpg"),
                ("count_in_stock", "99"),
                ("return_to", "/"),
            ],
        )
        .await;
    assert_eq!(location(&response), Some("/cart"));

    let (_, body) = ctx.get("/cart").await;
    assert!(body.contains(ADDED));
    assert!(body.contains("$25.00"));
    assert!(!body.contains("$0.01"));
    assert!(!body.contains("Free Tee"));
    assert!(!body.contains("evil.example"));
}

#[tokio::test]
async fn test_update_and_remove() {
    let ctx = TestContext::start(vec![tee()]).await;
    ctx.add_to_cart(&tee(), "/").await;

    let response = ctx
        .post_form("/cart/update", &[("product_id", "tee-1"), ("quantity", "3")])
        .await;
    assert_eq!(location(&response), Some("/cart"));

    let (_, body) = ctx.get("/cart").await;
    assert!(body.contains(r#"<option value="3" selected>"#));
    assert!(body.contains("$75.00"));

    let response = ctx
        .post_form("/cart/update", &[("product_id", "tee-1"), ("quantity", "9")])
        .await;
    assert_eq!(location(&response), Some("/cart"));

    let (_, body) = ctx.get("/cart").await;
    assert!(body.contains(OUT_OF_STOCK));
    assert!(body.contains(r#"<option value="3" selected>"#));

    let response = ctx
        .post_form("/cart/remove", &[("product_id", "tee-1")])
        .await;
    assert_eq!(location(&response), Some("/cart"));

    let (_, body) = ctx.get("/cart").await;
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_update_unknown_line_is_rejected() {
    let ctx = TestContext::start(vec![tee()]).await;

    let response = ctx
        .post_form("/cart/update", &[("product_id", "tee-1"), ("quantity", "2")])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
