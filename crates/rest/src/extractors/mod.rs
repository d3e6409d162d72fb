//! Axum extractors for ZTC requests.
//!
//! - [`ResourceQuery`] - view directives and list query from the query string

mod resource_query;

pub use resource_query::ResourceQuery;
