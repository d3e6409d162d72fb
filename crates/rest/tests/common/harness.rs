//! REST API test harness.
//!
//! Builds a [`TestServer`] over the full middleware stack, loaded with the
//! seed data shipped in `data/seed.json`.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;
use ztc_catalog::{CatalogSeed, CatalogStore};
use ztc_rest::{ServerConfig, create_app_with_config};

const SEED: &str = include_str!("../../../../data/seed.json");

/// Base URL every link in a test response starts with.
pub const BASE_URL: &str = "http://testserver";

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// let harness = RestTestHarness::new();
/// let body = harness.get_json("/catalogussen/1").await;
/// assert_eq!(body["domein"], "ABCDE");
/// ```
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The seeded store.
    pub store: Arc<CatalogStore>,

    /// Server configuration.
    pub config: ServerConfig,
}

impl RestTestHarness {
    /// Creates a harness with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with a custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let seed: CatalogSeed = serde_json::from_str(SEED).expect("Failed to parse seed data");
        let store = Arc::new(seed.into_store().expect("Failed to load seed data"));

        let app = create_app_with_config(Arc::clone(&store), config.clone());
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            store,
            config,
        }
    }

    /// Makes a GET request.
    pub async fn get(&self, path: &str) -> axum_test::TestResponse {
        self.server.get(path).await
    }

    /// Makes a GET request, asserts `200 OK` and returns the body.
    pub async fn get_json(&self, path: &str) -> Value {
        let response = self.server.get(path).await;
        response.assert_status_ok();
        response.json::<Value>()
    }

    /// Makes a GET request on a list endpoint and returns `results`.
    pub async fn get_results(&self, path: &str) -> Vec<Value> {
        let body = self.get_json(path).await;
        body["results"]
            .as_array()
            .cloned()
            .expect("list response without results array")
    }
}

/// Returns true when every key occurs in `body` and in the given order.
///
/// Works on the raw text since `serde_json::Value` does not keep key order.
pub fn keys_in_order(body: &str, keys: &[&str]) -> bool {
    let positions: Option<Vec<usize>> = keys
        .iter()
        .map(|key| body.find(&format!("\"{key}\":")))
        .collect();
    positions.is_some_and(|positions| positions.windows(2).all(|w| w[0] < w[1]))
}
