//! Integration tests for the ASTIG 03 storefront.
//!
//! Each test starts two servers on ephemeral ports: a fake content backend
//! that answers the storefront's GROQ queries from in-memory fixtures, and
//! the storefront itself, pointed at the fake through `api_host`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p astig-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Home page, catalog fragment, health checks
//! - `storefront_cart` - Add to cart, stock checks, notifications
//! - `storefront_products` - Product detail, search, JSON API

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

use astig_storefront::config::{ContentConfig, SentryConfig, StorefrontConfig};
use astig_storefront::content::queries;
use astig_storefront::state::AppState;

// =============================================================================
// Fixtures
// =============================================================================

/// A product document as stored in the content backend.
#[must_use]
pub fn product_json(id: &str, name: &str, price: f64, count_in_stock: u32) -> Value {
    let slug = name.to_lowercase().replace(' ', "-");
    json!({
        "_id": id,
        "_type": "product",
        "name": name,
        "slug": { "_type": "slug", "current": slug },
        "price": price,
        "image": {
            "_type": "image",
            "asset": { "_ref": format!("image-{id}-600x800-jpg"), "_type": "reference" }
        },
        "countInStock": count_in_stock,
        "category": "Shirts",
        "brand": "ASTIG",
        "rating": 4.5,
        "numReviews": 10,
        "description": format!("{name} description"),
    })
}

// =============================================================================
// Fake Content Backend
// =============================================================================

#[derive(Default)]
struct BackendState {
    products: Vec<Value>,
    /// Live stock counts, overriding the catalog's `countInStock`.
    stock: HashMap<String, u32>,
    /// When set, catalog queries fail with this message.
    catalog_failure: Option<String>,
    /// Every query text received, in order.
    queries: Vec<String>,
}

/// In-memory stand-in for the content backend's query API.
#[derive(Clone, Default)]
pub struct FakeContentBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeContentBackend {
    #[must_use]
    pub fn with_products(products: Vec<Value>) -> Self {
        let backend = Self::default();
        backend.lock().products = products;
        backend
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().expect("backend state lock")
    }

    /// Change the live stock count without touching the catalog listing.
    pub fn set_stock(&self, id: &str, count: u32) {
        self.lock().stock.insert(id.to_string(), count);
    }

    /// Make catalog queries fail with `message`.
    pub fn fail_catalog(&self, message: &str) {
        self.lock().catalog_failure = Some(message.to_string());
    }

    /// Number of received queries with exactly this text.
    #[must_use]
    pub fn query_count(&self, query: &str) -> usize {
        self.lock().queries.iter().filter(|q| *q == query).count()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/{version}/data/query/{dataset}", get(handle_query))
            .with_state(self.clone())
    }
}

/// Decode a `$name` parameter (JSON-encoded string).
fn string_param(params: &HashMap<String, String>, name: &str) -> String {
    params
        .get(&format!("${name}"))
        .and_then(|raw| serde_json::from_str::<String>(raw).ok())
        .unwrap_or_default()
}

fn result(value: impl Into<Value>) -> Response {
    Json(json!({ "result": value.into() })).into_response()
}

async fn handle_query(
    State(backend): State<FakeContentBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = params.get("query").cloned().unwrap_or_default();
    let mut guard = backend.lock();
    guard.queries.push(query.clone());
    let state = &*guard;

    match query.as_str() {
        q if q == queries::ALL_PRODUCTS => match &state.catalog_failure {
            Some(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": { "description": message } })),
            )
                .into_response(),
            None => result(state.products.clone()),
        },
        q if q == queries::PRODUCT_BY_ID => {
            let id = string_param(&params, "id");
            let product = state
                .products
                .iter()
                .find(|p| p["_id"] == id.as_str())
                .cloned()
                .map(|mut product| {
                    if let Some(count) = state.stock.get(&id) {
                        product["countInStock"] = json!(count);
                    }
                    product
                });
            result(product.unwrap_or(Value::Null))
        }
        q if q == queries::PRODUCT_BY_SLUG => {
            let slug = string_param(&params, "slug");
            let product = state
                .products
                .iter()
                .find(|p| p["slug"]["current"] == slug.as_str())
                .cloned();
            result(product.unwrap_or(Value::Null))
        }
        q if q == queries::CATEGORIES => {
            let mut categories: Vec<Value> = Vec::new();
            for category in state.products.iter().map(|p| p["category"].clone()) {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
            result(categories)
        }
        q if q == queries::PRODUCT_COUNT => result(state.products.len()),
        // Search: only the name filter is emulated
        _ => {
            let pattern = string_param(&params, "query");
            let term = pattern.trim_end_matches('*').to_lowercase();
            let products: Vec<Value> = state
                .products
                .iter()
                .filter(|p| {
                    p["name"]
                        .as_str()
                        .is_some_and(|name| name.to_lowercase().contains(&term))
                })
                .cloned()
                .collect();
            result(products)
        }
    }
}

// =============================================================================
// Test Context
// =============================================================================

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    addr
}

/// A running storefront wired to a fake content backend.
pub struct TestContext {
    /// Cookie-keeping client that does not follow redirects.
    pub client: reqwest::Client,
    pub base_url: String,
    pub backend: FakeContentBackend,
}

impl TestContext {
    /// Start the fake backend with `products`, then the storefront.
    pub async fn start(products: Vec<Value>) -> Self {
        let backend = FakeContentBackend::with_products(products);
        let backend_addr = serve(backend.router()).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("valid ip"),
            port: 0,
            base_url: "http://localhost".to_string(),
            store_name: "ASTIG 03".to_string(),
            content: ContentConfig {
                project_id: "k3x7ab12".to_string(),
                dataset: "production".to_string(),
                api_version: "2021-10-21".to_string(),
                use_cdn: true,
                api_host: Some(
                    url::Url::parse(&format!("http://{backend_addr}")).expect("valid url"),
                ),
                api_token: None,
            },
            sentry: SentryConfig::default(),
        };

        let storefront_addr = serve(astig_storefront::app(AppState::new(config))).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{storefront_addr}"),
            backend,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return status and body.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request succeeds");
        let status = response.status();
        (status, response.text().await.expect("read body"))
    }

    /// POST a form to `path`, returning the response unfollowed.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("request succeeds")
    }

    /// Submit the add-to-cart form for a product fixture, as a tile does.
    pub async fn add_to_cart(&self, product: &Value, return_to: &str) -> reqwest::Response {
        self.post_form(
            "/cart/add",
            &[
                ("product_id", product["_id"].as_str().unwrap_or_default()),
                ("return_to", return_to),
            ],
        )
        .await
    }
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
