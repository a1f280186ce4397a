//! Product search handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use super::home::{CatalogView, ProductTile};
use crate::content::{SearchFilter, SearchSort};
use crate::filters;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: SearchSort,
}

impl From<SearchQuery> for SearchFilter {
    fn from(query: SearchQuery) -> Self {
        Self {
            query: query.query.trim().to_string(),
            category: query.category.filter(|c| !c.is_empty()),
            sort: query.sort,
        }
    }
}

/// A `<select>` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub layout: Layout,
    pub query: String,
    pub categories: Vec<FilterOption>,
    pub sorts: Vec<FilterOption>,
    pub catalog: CatalogView,
    pub return_to: String,
}

fn category_options(categories: Vec<String>, selected: Option<&str>) -> Vec<FilterOption> {
    categories
        .into_iter()
        .map(|name| FilterOption {
            selected: selected == Some(name.as_str()),
            label: name.clone(),
            value: name,
        })
        .collect()
}

fn sort_options(selected: SearchSort) -> Vec<FilterOption> {
    SearchSort::ALL
        .iter()
        .map(|sort| FilterOption {
            value: sort.as_str().to_string(),
            label: sort.label().to_string(),
            selected: *sort == selected,
        })
        .collect()
}

/// Path and query of this search, so add-to-cart can come back to it.
fn return_path(filter: &SearchFilter) -> String {
    let mut pairs = url::form_urlencoded::Serializer::new(String::new());
    if !filter.query.is_empty() {
        pairs.append_pair("query", &filter.query);
    }
    if let Some(category) = &filter.category {
        pairs.append_pair("category", category);
    }
    if filter.sort != SearchSort::Default {
        pairs.append_pair("sort", filter.sort.as_str());
    }

    let query = pairs.finish();
    if query.is_empty() {
        "/search".to_string()
    } else {
        format!("/search?{query}")
    }
}

/// Display search results.
#[instrument(skip(state, session))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let filter = SearchFilter::from(query);
    let content = state.content();

    let categories = content.get_categories().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch categories: {e}");
        Vec::new()
    });

    let catalog = match content.search_products(&filter).await {
        Ok(products) => CatalogView::Loaded(
            products
                .iter()
                .map(|product| ProductTile::new(product, content.images()))
                .collect(),
        ),
        Err(e) => {
            tracing::error!("Product search failed: {e}");
            CatalogView::Failed(e.to_string())
        }
    };

    SearchTemplate {
        layout: Layout::load(&state, &session).await,
        query: filter.query.clone(),
        categories: category_options(categories, filter.category.as_deref()),
        sorts: sort_options(filter.sort),
        catalog,
        return_to: return_path(&filter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_query() {
        let filter = SearchFilter::from(SearchQuery {
            query: "  tee ".to_string(),
            category: Some(String::new()),
            sort: SearchSort::Lowest,
        });

        assert_eq!(filter.query, "tee");
        assert_eq!(filter.category, None);
        assert_eq!(filter.sort, SearchSort::Lowest);
    }

    #[test]
    fn test_category_options_mark_selection() {
        let options = category_options(
            vec!["Pants".to_string(), "Shirts".to_string()],
            Some("Shirts"),
        );

        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(options[1].value, "Shirts");
    }

    #[test]
    fn test_sort_options_cover_every_order() {
        let options = sort_options(SearchSort::TopRated);

        assert_eq!(options.len(), SearchSort::ALL.len());
        assert_eq!(
            options.iter().filter(|o| o.selected).map(|o| o.value.as_str()).collect::<Vec<_>>(),
            ["toprated"]
        );
    }

    #[test]
    fn test_return_path() {
        assert_eq!(return_path(&SearchFilter::default()), "/search");

        let filter = SearchFilter {
            query: "linen shirt".to_string(),
            category: Some("Shirts".to_string()),
            sort: SearchSort::Highest,
        };
        assert_eq!(
            return_path(&filter),
            "/search?query=linen+shirt&category=Shirts&sort=highest"
        );
    }

    #[test]
    fn test_search_page_renders_results() {
        use crate::content::ImageUrlBuilder;
        use crate::routes::home::tests::product;

        let images = ImageUrlBuilder::new("k3x7ab12", "production");
        let html = SearchTemplate {
            layout: Layout::default(),
            query: "tee".to_string(),
            categories: category_options(vec!["Shirts".to_string()], None),
            sorts: sort_options(SearchSort::Default),
            catalog: CatalogView::Loaded(vec![ProductTile::new(
                &product("tee1", "Oversized Tee"),
                &images,
            )]),
            return_to: "/search?query=tee".to_string(),
        }
        .render()
        .expect("search template renders");

        assert_eq!(html.matches("class=\"product-tile\"").count(), 1);
        assert!(html.contains(r#"value="tee""#));
    }
}
