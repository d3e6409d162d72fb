//! # ztc-rest - Catalog type registry REST API
//!
//! This crate serves the read side of the ZTC catalog type registry over
//! HTTP. Every endpoint answers with JSON and honours the `expand` and
//! `fields` query parameters, which are applied by the [`ztc_view`] resolver.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ztc_catalog::CatalogStore;
//! use ztc_rest::{create_app_with_config, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(CatalogStore::new());
//!     let config = ServerConfig::default();
//!     let addr = config.socket_addr();
//!
//!     let app = create_app_with_config(store, config);
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | list catalogs | GET | `/catalogussen` |
//! | read catalog | GET | `/catalogussen/{catalogus_pk}` |
//! | list nested | GET | `/catalogussen/{catalogus_pk}/{collection}` |
//! | read nested | GET | `/catalogussen/{catalogus_pk}/{collection}/{pk}` |
//! | health | GET | `/health` |
//!
//! Nested collections are `besluittypen`, `informatieobjecttypen` and
//! `eigenschappen`.
//!
//! ## Query Parameters
//!
//! - `expand=a,b.c` - Embed the named relations; `expand=true` embeds all
//! - `fields=a,b` - Keep only the named top-level fields
//! - `sorteer=-veld` - Sort a list, `-` for descending
//! - `zoek=term` - Free-text search, all terms must match
//! - anything else - Exact-match filter on a field
//!
//! ## HTTP Headers
//!
//! - `Accept` - Must admit JSON, otherwise `406 Not Acceptable`
//! - `API-Version` - Sent on every response
//!
//! ## Error Handling
//!
//! Errors are returned as `application/problem+json` with an
//! `invalidParams` list for client errors. See [`error`].
//!
//! ## Architecture
//!
//! - [`error`] - Error types and problem details
//! - [`config`] - Server configuration
//! - [`state`] - Application state (graph, resolver, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Content negotiation and the `API-Version` header
//! - [`extractors`] - Query parameter parsing
//! - [`responses`] - List envelope
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::{Router, http::HeaderValue};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use ztc_catalog::CatalogStore;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app(store: Arc<CatalogStore>) -> Router {
    create_app_with_config(store, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up all routes plus tracing, request timeout, JSON content
/// negotiation, the `API-Version` header and optionally CORS.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use ztc_catalog::CatalogStore;
/// use ztc_rest::{create_app_with_config, ServerConfig};
///
/// let config = ServerConfig {
///     base_url: "https://ztc.example.nl/api/v1".to_string(),
///     ..Default::default()
/// };
/// let app = create_app_with_config(Arc::new(CatalogStore::new()), config);
/// ```
pub fn create_app_with_config(store: Arc<CatalogStore>, config: ServerConfig) -> Router {
    let state = AppState::new(store, config.clone());
    info!(
        backend = state.backend_name(),
        catalogussen = state.graph().store().catalogus_count(),
        base_url = %config.base_url,
        "Creating REST API server"
    );

    let router = routing::ztc_routes::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let api_version = HeaderValue::from_str(&config.api_version).unwrap_or_else(|_| {
        warn!(api_version = %config.api_version, "Invalid API version header value, using 1.0.0");
        HeaderValue::from_static("1.0.0")
    });

    // The version header wraps content negotiation so a 406 carries it too
    let router = router
        .layer(axum::middleware::from_fn(
            middleware::require_json_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            api_version,
            middleware::api_version_middleware,
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    // API-Version has to be readable by browser clients
    cors.expose_headers([middleware::API_VERSION.clone()])
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ztc_rest={level},ztc_view={level},ztc_catalog={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
