//! Headless content backend client.
//!
//! # Architecture
//!
//! - Products live in a Sanity-style content lake, queried with GROQ over
//!   plain HTTP GET (`/v{api_version}/data/query/{dataset}`)
//! - The content backend is source of truth - NO local sync, NO response cache
//! - Catalog reads may go through the API CDN; stock reads always hit the
//!   live API so add-to-cart sees current inventory
//!
//! # Seams
//!
//! Route handlers depend on the [`CatalogSource`] and [`StockLookup`] traits
//! rather than on [`ContentClient`] directly, so the catalog loader and the
//! add-to-cart operation can be exercised without the network.
//!
//! # Example
//!
//! ```rust,ignore
//! use astig_storefront::content::ContentClient;
//!
//! let client = ContentClient::new(&config.content);
//!
//! // Every product document
//! let products = client.fetch_products().await?;
//!
//! // Live document (price and stock) for one product
//! let product = client.get_product(&products[0].id).await?;
//! ```

mod image;
pub mod queries;
pub mod types;

pub use image::ImageUrlBuilder;
pub use types::*;

use std::future::Future;
use std::sync::Arc;

use astig_core::ProductId;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ContentConfig;

/// Errors that can occur when talking to the content backend.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the query.
    #[error("Content API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error description from the response body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Anything that can list the product catalog.
pub trait CatalogSource: Send + Sync {
    /// Fetch every product document, in backend order.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, ContentError>> + Send;
}

/// Anything that can return the authoritative copy of a product.
///
/// Cart lines take their price, name and stock count from this document.
pub trait StockLookup: Send + Sync {
    /// Current document for `id`, bypassing any cache.
    fn live_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, ContentError>> + Send;
}

// =============================================================================
// ContentClient
// =============================================================================

/// Client for the content backend's GROQ query API.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    /// Query endpoint used for catalog reads (CDN when enabled).
    read_endpoint: String,
    /// Query endpoint that always bypasses the CDN.
    live_endpoint: String,
    token: Option<SecretString>,
    images: ImageUrlBuilder,
}

/// Envelope around every successful query response.
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

impl ContentClient {
    /// Create a new content backend client.
    #[must_use]
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            inner: Arc::new(ContentClientInner {
                client: reqwest::Client::new(),
                read_endpoint: config.query_endpoint(config.use_cdn),
                live_endpoint: config.query_endpoint(false),
                token: config.api_token.clone(),
                images: ImageUrlBuilder::new(&config.project_id, &config.dataset),
            }),
        }
    }

    /// Image URL builder for this project and dataset.
    #[must_use]
    pub fn images(&self) -> &ImageUrlBuilder {
        &self.inner.images
    }

    /// Execute a GROQ query.
    ///
    /// `params` are passed as `$name` query parameters with JSON-encoded
    /// values, so user input never becomes part of the query text.
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<T, ContentError> {
        let mut pairs: Vec<(String, String)> = Vec::with_capacity(params.len() + 1);
        pairs.push(("query".to_string(), query.to_string()));
        for (name, value) in params {
            pairs.push((format!("${name}"), value.to_string()));
        }

        let mut request = self.inner.client.get(endpoint).query(&pairs);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Content API returned non-success status"
            );
            return Err(ContentError::Api {
                status: status.as_u16(),
                message: describe_api_error(&response_text),
            });
        }

        let response: QueryResponse<T> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse content query response"
                );
                return Err(ContentError::Parse(e));
            }
        };

        Ok(response.result)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get every product document.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ContentError> {
        let products: Vec<Product> = self
            .execute(&self.inner.read_endpoint, queries::ALL_PRODUCTS, &[])
            .await?;
        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    /// Get a product by its document ID, bypassing the CDN.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ContentError> {
        let product: Option<Product> = self
            .execute(
                &self.inner.live_endpoint,
                queries::PRODUCT_BY_ID,
                &[("id", serde_json::Value::String(id.to_string()))],
            )
            .await?;

        product.ok_or_else(|| ContentError::NotFound(format!("Product not found: {id}")))
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Product, ContentError> {
        let product: Option<Product> = self
            .execute(
                &self.inner.read_endpoint,
                queries::PRODUCT_BY_SLUG,
                &[("slug", serde_json::Value::String(slug.to_string()))],
            )
            .await?;

        product.ok_or_else(|| ContentError::NotFound(format!("Product not found: {slug}")))
    }

    /// Search products by name and category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        filter: &SearchFilter,
    ) -> Result<Vec<Product>, ContentError> {
        let query = queries::search_products(filter.sort);
        let params = [
            ("query", serde_json::Value::String(filter.query_pattern())),
            (
                "category",
                serde_json::Value::String(filter.category.clone().unwrap_or_default()),
            ),
        ];
        self.execute(&self.inner.read_endpoint, &query, &params)
            .await
    }

    /// Get the distinct product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<String>, ContentError> {
        let categories: Vec<Option<String>> = self
            .execute(&self.inner.read_endpoint, queries::CATEGORIES, &[])
            .await?;
        let mut categories: Vec<String> = categories.into_iter().flatten().collect();
        categories.sort();
        Ok(categories)
    }

    /// Cheap round trip used by the readiness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    pub async fn ping(&self) -> Result<u64, ContentError> {
        self.execute(&self.inner.live_endpoint, queries::PRODUCT_COUNT, &[])
            .await
    }
}

impl CatalogSource for ContentClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, ContentError> {
        self.get_products().await
    }
}

impl StockLookup for ContentClient {
    async fn live_product(&self, id: &ProductId) -> Result<Product, ContentError> {
        self.get_product(id).await
    }
}

/// Pull a readable message out of an error response body.
///
/// Query errors look like `{"error": {"description": "..."}}`; auth and
/// routing errors look like `{"error": "...", "message": "..."}`.
fn describe_api_error(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.chars().take(200).collect();
    };

    value
        .pointer("/error/description")
        .or_else(|| value.get("message"))
        .or_else(|| value.get("error"))
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| body.chars().take(200).collect(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_error_display() {
        let err = ContentError::NotFound("Product not found: abc".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found: abc");

        let err = ContentError::Api {
            status: 400,
            message: "expected '}' following object body".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Content API error (400): expected '}' following object body"
        );
    }

    #[test]
    fn test_describe_query_error() {
        let body = r#"{"error":{"description":"unknown function","type":"queryParseError"}}"#;
        assert_eq!(describe_api_error(body), "unknown function");
    }

    #[test]
    fn test_describe_auth_error() {
        let body = r#"{"error":"Unauthorized","message":"Session not found","statusCode":401}"#;
        assert_eq!(describe_api_error(body), "Session not found");
    }

    #[test]
    fn test_describe_non_json_error() {
        assert_eq!(describe_api_error("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_query_response_envelope() {
        let body = r#"{"ms":3,"query":"count(*)","result":42}"#;
        let parsed: QueryResponse<u64> = serde_json::from_str(body).expect("valid envelope");
        assert_eq!(parsed.result, 42);
    }
}
