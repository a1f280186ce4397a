//! Document types for the content backend.
//!
//! Field names mirror the stored documents (`_id`, `countInStock`, ...) so the
//! same types round-trip through the product JSON endpoint unchanged.

use astig_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Product
// =============================================================================

/// A product document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: Slug,
    /// Unit price in the store currency. Stored as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Main product image.
    #[serde(default)]
    pub image: Option<ImageRef>,
    /// Remaining inventory.
    #[serde(default)]
    pub count_in_stock: u32,
    /// Category name.
    #[serde(default)]
    pub category: Option<String>,
    /// Brand name.
    #[serde(default)]
    pub brand: Option<String>,
    /// Average review rating (0-5).
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of reviews behind `rating`.
    #[serde(default)]
    pub num_reviews: Option<u32>,
    /// Long-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Whether any inventory remains.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.count_in_stock > 0
    }
}

/// A slug field (`{"_type": "slug", "current": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    /// The slug value.
    pub current: String,
}

// =============================================================================
// Image Types
// =============================================================================

/// An image field pointing at an uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Asset reference.
    pub asset: AssetRef,
}

/// Reference to an asset document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Asset document ID, e.g. `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`.
    #[serde(rename = "_ref")]
    pub reference: String,
}

// =============================================================================
// Search Types
// =============================================================================

/// Sort order for product search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    /// Backend order.
    #[default]
    Default,
    /// Cheapest first.
    Lowest,
    /// Most expensive first.
    Highest,
    /// Highest rating first.
    TopRated,
}

impl SearchSort {
    /// Every sort order, in the order they are offered to shoppers.
    pub const ALL: [Self; 4] = [Self::Default, Self::Lowest, Self::Highest, Self::TopRated];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Lowest => "lowest",
            Self::Highest => "highest",
            Self::TopRated => "toprated",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Lowest => "Price: Low to High",
            Self::Highest => "Price: High to Low",
            Self::TopRated => "Customer Reviews",
        }
    }
}

/// Product search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Free-text name search; empty matches everything.
    pub query: String,
    /// Restrict to one category.
    pub category: Option<String>,
    /// Result ordering.
    pub sort: SearchSort,
}

impl SearchFilter {
    /// GROQ `match` pattern for the name search (`"term*"`, or `"*"`).
    #[must_use]
    pub fn query_pattern(&self) -> String {
        let term = self.query.trim();
        if term.is_empty() {
            "*".to_string()
        } else {
            format!("{term}*")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_JSON: &str = r#"{
        "_id": "3bf4d6a1-0c2e-4a39-9f0a-1d2e3f4a5b6c",
        "_type": "product",
        "name": "Astig Oversized Tee",
        "slug": {"_type": "slug", "current": "astig-oversized-tee"},
        "price": 70,
        "image": {
            "_type": "image",
            "asset": {"_ref": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg", "_type": "reference"}
        },
        "countInStock": 20,
        "category": "Shirts",
        "brand": "Astig",
        "rating": 4.5,
        "numReviews": 10,
        "description": "A loose-fit cotton tee"
    }"#;

    #[test]
    fn test_product_deserializes_document() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).expect("valid product JSON");
        assert_eq!(product.id.as_str(), "3bf4d6a1-0c2e-4a39-9f0a-1d2e3f4a5b6c");
        assert_eq!(product.slug.current, "astig-oversized-tee");
        assert_eq!(product.price, Decimal::new(70, 0));
        assert_eq!(product.count_in_stock, 20);
        assert_eq!(product.num_reviews, Some(10));
        assert_eq!(
            product.image.map(|i| i.asset.reference).as_deref(),
            Some("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg")
        );
    }

    #[test]
    fn test_product_optional_fields_default() {
        let json = r#"{"_id": "p1", "name": "Cap", "slug": {"current": "cap"}, "price": 12.5}"#;
        let product: Product = serde_json::from_str(json).expect("valid product JSON");
        assert_eq!(product.count_in_stock, 0);
        assert!(!product.in_stock());
        assert!(product.image.is_none());
        assert!(product.rating.is_none());
    }

    #[test]
    fn test_product_serializes_with_document_field_names() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).expect("valid product JSON");
        let value = serde_json::to_value(&product).expect("serializable");
        assert_eq!(value["_id"], "3bf4d6a1-0c2e-4a39-9f0a-1d2e3f4a5b6c");
        assert_eq!(value["countInStock"], 20);
        assert_eq!(value["slug"]["current"], "astig-oversized-tee");
        assert_eq!(value["price"], 70.0);
    }

    #[test]
    fn test_fractional_price_stays_a_number() {
        let json = r#"{"_id": "p1", "name": "Cap", "slug": {"current": "cap"}, "price": 49.99}"#;
        let product: Product = serde_json::from_str(json).expect("valid product JSON");
        assert_eq!(product.price, Decimal::new(4999, 2));

        let value = serde_json::to_value(&product).expect("serializable");
        assert!(value["price"].is_number());
        assert_eq!(value["price"], 49.99);
    }

    #[test]
    fn test_query_pattern() {
        let mut filter = SearchFilter::default();
        assert_eq!(filter.query_pattern(), "*");

        filter.query = "  tee ".to_string();
        assert_eq!(filter.query_pattern(), "tee*");
    }

    #[test]
    fn test_search_sort_round_trip_names() {
        for sort in SearchSort::ALL {
            let json = serde_json::to_string(&sort).expect("serializable");
            assert_eq!(json, format!("\"{}\"", sort.as_str()));
        }
    }
}
