//! `API-Version` response header.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::HeaderName},
    middleware::Next,
    response::Response,
};

/// Header carrying the semantic version of the API.
pub static API_VERSION: HeaderName = HeaderName::from_static("api-version");

/// Middleware adding the `API-Version` header to every response, errors included.
///
/// This can be used with `axum::middleware::from_fn_with_state`.
pub async fn api_version_middleware(
    State(version): State<HeaderValue>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(API_VERSION.clone(), version);
    response
}
