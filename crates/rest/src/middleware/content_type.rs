//! Content negotiation middleware.
//!
//! The API only speaks JSON. A request whose `Accept` header rules out JSON
//! is answered with `406 Not Acceptable` before it reaches a handler.

use axum::{
    extract::Request,
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::RestError;

/// Returns true when a single media range admits JSON.
///
/// Accepts `*/*`, `application/*`, `application/json` and structured
/// `+json` types such as `application/problem+json`. Quality values are
/// not weighed.
fn media_range_allows_json(range: &str) -> bool {
    let Ok(parsed) = range.trim().parse::<mime::Mime>() else {
        return false;
    };
    if parsed.type_() == mime::STAR {
        return parsed.subtype() == mime::STAR;
    }
    parsed.type_() == mime::APPLICATION
        && (parsed.subtype() == mime::STAR
            || parsed.subtype() == mime::JSON
            || parsed.suffix() == Some(mime::JSON))
}

/// Checks the `Accept` header.
///
/// A missing or empty header accepts anything.
pub fn accepts_json(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT) else {
        return true;
    };
    let Ok(accept) = accept.to_str() else {
        return false;
    };
    if accept.trim().is_empty() {
        return true;
    }
    accept.split(',').any(media_range_allows_json)
}

/// Middleware rejecting requests that cannot take a JSON response.
///
/// This can be used with `axum::middleware::from_fn`.
pub async fn require_json_middleware(request: Request, next: Next) -> Response {
    if accepts_json(request.headers()) {
        return next.run(request).await;
    }

    let accept = request
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    warn!(accept = %accept, path = %request.uri().path(), "Rejected unacceptable media type");

    RestError::NotAcceptable {
        message: format!("Cannot produce a response matching Accept: {}", accept),
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(accept: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_str(accept).unwrap());
        headers
    }

    #[test]
    fn test_json_accepted() {
        assert!(accepts_json(&HeaderMap::new()));
        assert!(accepts_json(&headers("application/json")));
        assert!(accepts_json(&headers("*/*")));
        assert!(accepts_json(&headers("application/*")));
        assert!(accepts_json(&headers("text/html, application/json;q=0.9")));
        assert!(accepts_json(&headers("application/hal+json")));
    }

    #[test]
    fn test_html_rejected() {
        assert!(!accepts_json(&headers("text/html")));
        assert!(!accepts_json(&headers("application/xml")));
        assert!(!accepts_json(&headers("not a media type")));
    }
}
