//! List response envelope.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use ztc_view::ResourceNode;

/// Body of a list response.
///
/// Items keep the order of the list query; each is resolved with the same
/// `expand` and `fields` directives.
#[derive(Debug, Default, Serialize)]
pub struct CollectionResponse {
    /// The resolved items.
    pub results: Vec<ResourceNode>,
}

impl CollectionResponse {
    /// Wraps resolved items.
    pub fn new(results: Vec<ResourceNode>) -> Self {
        Self { results }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true when there are no items.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl IntoResponse for CollectionResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
