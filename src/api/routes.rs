//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, liveness_handler, prices_handler, search_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /search?query=..&limit=..` - Product search
/// - `GET /prices?sku=..` - Per-size resell prices for one SKU
/// - `GET /health` - Liveness and cache occupancy
/// - `GET /stats` - Cache statistics
/// - `GET /test` - Liveness marker
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", get(search_handler))
        .route("/prices", get(prices_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/test", get(liveness_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::catalog::CatalogSettings;
    use crate::source::testing::{product, FakeSource};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let source = Arc::new(FakeSource::with_products(vec![product(
            "Dunk Low Panda",
            "DD1391-100",
        )]));
        let state = AppState::new(CacheStore::new(100, 600_000), source, CatalogSettings::default());
        create_router(state)
    }

    async fn status_of(uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        assert_eq!(status_of("/test").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(status_of("/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        assert_eq!(status_of("/search?query=dunk").await, StatusCode::OK);
        assert_eq!(status_of("/search").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_prices_missing_sku() {
        assert_eq!(status_of("/prices").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(status_of("/nope").await, StatusCode::NOT_FOUND);
    }
}
