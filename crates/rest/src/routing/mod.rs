//! Route configuration for the ZTC REST API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod ztc_routes;

pub use ztc_routes::create_routes;
