//! HTTP request handlers.
//!
//! - [`catalogus`] - List and read catalogs
//! - [`nested`] - List and read resources nested under a catalog
//! - [`health`] - Health check endpoint

pub mod catalogus;
pub mod health;
pub mod nested;

pub use catalogus::{list_catalogussen_handler, read_catalogus_handler};
pub use health::health_handler;
pub use nested::{list_nested_handler, read_nested_handler};

use crate::error::{RestError, RestResult};

/// Parses a numeric path id. Anything else cannot exist and is a 404.
pub(crate) fn parse_pk(resource: &str, raw: &str) -> RestResult<u64> {
    raw.parse().map_err(|_| RestError::NotFound {
        resource: resource.to_string(),
        id: raw.to_string(),
    })
}
