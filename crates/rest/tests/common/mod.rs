//! Common test utilities for REST API testing.
//!
//! - [`harness`] - Test server over the bundled seed catalog

pub mod harness;
