//! ZTC route configuration.
//!
//! Every resource route is read-only.

use axum::{Router, http::Uri, routing::get};

use crate::error::RestError;
use crate::handlers;
use crate::state::AppState;

/// Creates all ZTC REST API routes.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /catalogussen` - List catalogs
/// - `GET /catalogussen/{catalogus_pk}` - Read a catalog
/// - `GET /catalogussen/{catalogus_pk}/{collection}` - List a nested collection
/// - `GET /catalogussen/{catalogus_pk}/{collection}/{pk}` - Read a nested resource
///
/// Any other path answers with a problem+json `404`.
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/catalogussen", get(handlers::list_catalogussen_handler))
        .route(
            "/catalogussen/{catalogus_pk}",
            get(handlers::read_catalogus_handler),
        )
        .route(
            "/catalogussen/{catalogus_pk}/{collection}",
            get(handlers::list_nested_handler),
        )
        .route(
            "/catalogussen/{catalogus_pk}/{collection}/{pk}",
            get(handlers::read_nested_handler),
        )
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler(uri: Uri) -> RestError {
    RestError::NotFound {
        resource: "path".to_string(),
        id: uri.path().to_string(),
    }
}
