//! HTTP surface for storefront views
//!
//! Every request is one view activation: it loads its own snapshot and never
//! shares it with another request.

use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validator::Validate;

use crate::catalog::{query, CatalogIndex, FacetCounts, FilterCriteria, SortPolicy};
use crate::domain::aggregates::{CatalogRecord, Provenance};
use crate::domain::value_objects::{Availability, CategorySelector, PriceRange, CURRENCY};
use crate::source::{DataSource, DEFAULT_SIMILAR_LIMIT};
use crate::view::{CatalogView, LoadState, RecommendationResolver};

type ApiError = (StatusCode, String);

#[derive(Clone)]
pub struct AppState { pub source: Arc<dyn DataSource>, pub similar_limit: usize }

impl AppState {
    pub fn new(source: Arc<dyn DataSource>) -> Self { Self { source, similar_limit: DEFAULT_SIMILAR_LIMIT } }
    pub fn with_similar_limit(mut self, limit: usize) -> Self { self.similar_limit = limit; self }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-storefront"})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/products/:id/similar", get(similar_products))
        .route("/api/v1/facets", get(list_facets))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(state)
}

/// Price bounds are parsed leniently: anything that is not a number falls
/// back to the default bound.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListParams {
    #[validate(length(max = 200))]
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub availability: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> Result<(FilterCriteria, SortPolicy), ApiError> {
        let bad_request = |e: crate::domain::value_objects::ParseSelectorError| (StatusCode::BAD_REQUEST, e.to_string());
        let sort = self.sort.as_deref().map(str::parse::<SortPolicy>).transpose().map_err(bad_request)?.unwrap_or_default();
        let availability = self.availability.as_deref().map(str::parse::<Availability>).transpose().map_err(bad_request)?.unwrap_or_default();
        let min = self.min_price.and_then(|v| v.trim().parse().ok()).unwrap_or(PriceRange::DEFAULT_MIN);
        let max = self.max_price.and_then(|v| v.trim().parse().ok()).unwrap_or(PriceRange::DEFAULT_MAX);
        let criteria = FilterCriteria {
            search_term: self.search.unwrap_or_default(),
            category: self.category.map(CategorySelector::from).unwrap_or_default(),
            price_range: PriceRange::new(min, max),
            availability,
        };
        Ok((criteria, sort))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SimilarParams {
    #[validate(range(min = 1, max = 24))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ProductListing {
    pub provenance: Provenance,
    pub currency: &'static str,
    pub total: usize,
    pub sort: SortPolicy,
    pub sort_label: &'static str,
    pub criteria: FilterCriteria,
    pub facets: FacetCounts,
    pub items: Vec<CatalogRecord>,
}

#[derive(Debug, Serialize)]
pub struct SimilarListing { pub provenance: Provenance, pub reference_id: String, pub items: Vec<CatalogRecord> }

#[derive(Debug, Serialize)]
pub struct FacetListing { pub provenance: Provenance, #[serde(flatten)] pub facets: FacetCounts }

fn ready<T>(state: LoadState<T>) -> Result<Arc<T>, ApiError> {
    state.ready().cloned().ok_or((StatusCode::SERVICE_UNAVAILABLE, "Catalog not ready".to_string()))
}

async fn load_catalog(s: &AppState) -> Result<Arc<CatalogIndex>, ApiError> {
    ready(CatalogView::new(s.source.clone()).activate().await)
}

async fn list_products(State(s): State<AppState>, Query(p): Query<ListParams>) -> Result<Json<ProductListing>, ApiError> {
    p.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let (criteria, sort) = p.into_query()?;
    let index = load_catalog(&s).await?;
    let items: Vec<CatalogRecord> = query::run(index.snapshot().records(), &criteria, sort).into_iter().cloned().collect();
    Ok(Json(ProductListing {
        provenance: index.provenance(), currency: CURRENCY, total: items.len(), sort, sort_label: sort.label(),
        criteria, facets: index.facets().clone(), items,
    }))
}

async fn get_product(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<CatalogRecord>, ApiError> {
    let index = load_catalog(&s).await?;
    index.snapshot().find(&id).cloned().map(Json).ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

async fn similar_products(State(s): State<AppState>, Path(id): Path<String>, Query(p): Query<SimilarParams>) -> Result<Json<SimilarListing>, ApiError> {
    p.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let index = load_catalog(&s).await?;
    let reference = index.snapshot().find(&id).cloned().ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))?;
    let resolver = RecommendationResolver::new(s.source.clone()).with_limit(p.limit.unwrap_or(s.similar_limit));
    let snapshot = ready(resolver.resolve(&reference).await)?;
    Ok(Json(SimilarListing { provenance: snapshot.provenance(), reference_id: reference.id, items: snapshot.records().to_vec() }))
}

async fn list_facets(State(s): State<AppState>) -> Result<Json<FacetListing>, ApiError> {
    let index = load_catalog(&s).await?;
    Ok(Json(FacetListing { provenance: index.provenance(), facets: index.facets().clone() }))
}
