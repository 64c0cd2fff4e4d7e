//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::CacheStore;
use crate::catalog::{CatalogService, CatalogSettings};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{
    HealthResponse, LivenessResponse, PricesParams, SearchParams, StatsResponse,
};
use crate::source::ProductSource;

/// Application state shared across all handlers.
///
/// The cache is constructed once at startup and shared between the catalog
/// service and the diagnostic endpoints.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe response cache
    pub cache: Arc<RwLock<CacheStore>>,
    /// Lookup flows
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Creates a new AppState around the given cache and product source.
    pub fn new(
        cache: CacheStore,
        source: Arc<dyn ProductSource>,
        settings: CatalogSettings,
    ) -> Self {
        let cache = Arc::new(RwLock::new(cache));
        let catalog = Arc::new(CatalogService::new(source, cache.clone(), settings));
        Self { cache, catalog }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config, source: Arc<dyn ProductSource>) -> Self {
        let cache = CacheStore::new(config.cache_capacity, config.cache_ttl_ms);
        Self::new(cache, source, CatalogSettings::from(config))
    }
}

/// Handler for GET /search?query=..&limit=..
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>> {
    let query = params
        .query()
        .ok_or_else(|| ProxyError::InvalidRequest("The 'query' parameter is required".into()))?;
    let limit = params.limit_or(state.catalog.settings().default_search_limit);

    let results = state.catalog.search(query, limit).await?;
    Ok(Json(results))
}

/// Handler for GET /prices?sku=..
///
/// A degraded lookup (product found, prices unavailable) still answers 200.
pub async fn prices_handler(
    State(state): State<AppState>,
    Query(params): Query<PricesParams>,
) -> Result<Json<Value>> {
    let sku = params
        .sku()
        .ok_or_else(|| ProxyError::InvalidRequest("The 'sku' parameter is required".into()))?;

    let lookup = state.catalog.prices(sku).await?;
    Ok(Json(lookup.into_value()?))
}

/// Handler for GET /health
///
/// Reports liveness and the number of cached keys.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache_size = state.cache.read().await.len();
    Json(HealthResponse::ok(cache_size))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(&cache.stats(), cache.capacity()))
}

/// Handler for GET /test
pub async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse::alive())
}
