//! GROQ queries.
//!
//! Queries only reference `$params`; values are supplied separately by
//! `ContentClient::execute` and never interpolated into the query text.

use super::types::SearchSort;

/// Every product document, in backend order.
pub const ALL_PRODUCTS: &str = r#"*[_type == "product"]"#;

/// One product by document ID (`$id`).
pub const PRODUCT_BY_ID: &str = r#"*[_type == "product" && _id == $id][0]"#;

/// One product by slug (`$slug`).
pub const PRODUCT_BY_SLUG: &str = r#"*[_type == "product" && slug.current == $slug][0]"#;

/// Category of every product (deduplicated server-side).
pub const CATEGORIES: &str = r#"array::unique(*[_type == "product"].category)"#;

/// Number of product documents.
pub const PRODUCT_COUNT: &str = r#"count(*[_type == "product"])"#;

/// Product search filtered by `$query` (a `match` pattern) and `$category`
/// (empty string for any), ordered by `sort`.
#[must_use]
pub fn search_products(sort: SearchSort) -> String {
    let order = match sort {
        SearchSort::Default => "",
        SearchSort::Lowest => " | order(price asc)",
        SearchSort::Highest => " | order(price desc)",
        SearchSort::TopRated => " | order(rating desc)",
    };
    format!(
        r#"*[_type == "product" && name match $query && ($category == "" || category == $category)]{order}"#
    )
}
