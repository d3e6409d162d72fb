//! Error types for the ZTC REST API.
//!
//! Every error is rendered as an `application/problem+json` body:
//!
//! ```json
//! {
//!   "type": "urn:ztc:error:invalid-params",
//!   "code": "invalid-params",
//!   "title": "Invalid query parameters",
//!   "status": 400,
//!   "detail": "unknown field 'foobar'",
//!   "invalidParams": [{"name": "foobar", "code": "unknown-field", "reason": "unknown field 'foobar'"}]
//! }
//! ```
//!
//! # Error Mapping
//!
//! | Source Error | HTTP Status | Problem code |
//! |--------------|-------------|--------------|
//! | `ViewError::UnknownField` and other directive errors | 400 | invalid-params |
//! | `ViewError::FetchFailure` | 500 | fetch-failure |
//! | `CatalogError::NotFound` / `UnknownCollection` | 404 | not-found |
//! | `CatalogError::Query` | 400 | invalid-params |
//! | unacceptable `Accept` header | 406 | not-acceptable |

use std::fmt;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use ztc_catalog::{CatalogError, QueryError};
use ztc_view::ViewError;

/// Media type of error bodies.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// One rejected query parameter or directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidParam {
    /// The offending parameter, field or path.
    pub name: String,
    /// Machine readable reason.
    pub code: String,
    /// Human readable reason.
    pub reason: String,
}

impl InvalidParam {
    /// Creates an entry.
    pub fn new(name: impl Into<String>, code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            reason: reason.into(),
        }
    }
}

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Resource not found (HTTP 404).
    NotFound {
        /// The resource kind or collection (e.g., "besluittype").
        resource: String,
        /// The requested id.
        id: String,
    },

    /// Invalid query parameters or directives (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
        /// The individual problems.
        invalid_params: Vec<InvalidParam>,
    },

    /// The `Accept` header excludes JSON (HTTP 406).
    NotAcceptable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Bad request for a single parameter.
    pub fn invalid_param(name: impl Into<String>, code: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        RestError::BadRequest {
            message: reason.clone(),
            invalid_params: vec![InvalidParam::new(name, code, reason)],
        }
    }

    /// The HTTP status this error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { resource, id } => {
                write!(f, "Resource not found: {}/{}", resource, id)
            }
            RestError::BadRequest { message, .. } => {
                write!(f, "Bad request: {}", message)
            }
            RestError::NotAcceptable { message } => {
                write!(f, "Not acceptable: {}", message)
            }
            RestError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

/// Body of an error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Problem {
    #[serde(rename = "type")]
    kind: String,
    code: &'static str,
    title: &'static str,
    status: u16,
    detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    invalid_params: Vec<InvalidParam>,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, title, detail, invalid_params) = match self {
            RestError::NotFound { resource, id } => (
                "not-found",
                "Resource not found",
                format!("{} {} does not exist", resource, id),
                Vec::new(),
            ),
            RestError::BadRequest {
                message,
                invalid_params,
            } => ("invalid-params", "Invalid query parameters", message, invalid_params),
            RestError::NotAcceptable { message } => {
                ("not-acceptable", "Not acceptable", message, Vec::new())
            }
            RestError::InternalError { message } => {
                ("server-error", "Internal server error", message, Vec::new())
            }
        };

        let problem = Problem {
            kind: format!("urn:ztc:error:{}", code),
            code,
            title,
            status: status.as_u16(),
            detail,
            invalid_params,
        };

        let mut response = (status, Json(problem)).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}

fn view_error_code(err: &ViewError) -> &'static str {
    match err {
        ViewError::UnknownField { .. } => "unknown-field",
        ViewError::UnknownRelation { .. } => "unknown-relation",
        ViewError::NotExpandable { .. } => "not-expandable",
        ViewError::AmbiguousPath { .. } => "ambiguous-path",
        ViewError::InvalidPath { .. } => "invalid-path",
        ViewError::PathTooDeep { .. } => "path-too-deep",
        ViewError::FetchFailure { .. } => "fetch-failure",
    }
}

impl From<ViewError> for RestError {
    fn from(err: ViewError) -> Self {
        if err.is_client_error() {
            return RestError::invalid_param(err.subject(), view_error_code(&err), err.to_string());
        }
        error!(error = %err, "Relation fetch failed");
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

impl From<QueryError> for RestError {
    fn from(err: QueryError) -> Self {
        let code = match err {
            QueryError::UnknownFilter { .. } => "unknown-filter",
            QueryError::UnknownSortField { .. } | QueryError::EmptySortField => "invalid-sort",
        };
        RestError::invalid_param(err.subject(), code, err.to_string())
    }
}

impl From<CatalogError> for RestError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { resource, id } => RestError::NotFound {
                resource: resource.to_string(),
                id: id.to_string(),
            },
            CatalogError::UnknownCollection { collection } => RestError::NotFound {
                resource: "collection".to_string(),
                id: collection,
            },
            CatalogError::Query(err) => err.into(),
            other => {
                error!(error = %other, "Catalog error");
                RestError::InternalError {
                    message: other.to_string(),
                }
            }
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
