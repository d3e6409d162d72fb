//! HTTP middleware for the ZTC REST API.
//!
//! - [`content_type`] - Content negotiation
//! - [`api_version`] - `API-Version` response header

pub mod api_version;
pub mod content_type;

pub use api_version::{API_VERSION, api_version_middleware};
pub use content_type::{accepts_json, require_json_middleware};
