//! Application state for the ZTC REST API.
//!
//! The shared state available to all request handlers: the resource graph,
//! the view resolver and the server configuration.

use std::sync::Arc;

use ztc_catalog::{CatalogGraph, CatalogStore};
use ztc_view::ViewResolver;

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use ztc_catalog::CatalogStore;
/// use ztc_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(Arc::new(CatalogStore::new()), ServerConfig::default());
/// assert_eq!(state.graph().base_url(), "http://localhost:8080");
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Resource graph over the catalog store.
    graph: Arc<CatalogGraph>,

    /// Applies `expand` and `fields`.
    resolver: ViewResolver,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates a new AppState with the given store and configuration.
    ///
    /// Links are built from `config.base_url`; expansion paths are limited to
    /// `config.max_expand_depth` segments.
    pub fn new(store: Arc<CatalogStore>, config: ServerConfig) -> Self {
        let graph = CatalogGraph::new(store, &config.base_url);
        let resolver = ViewResolver::new().with_max_depth(config.max_expand_depth);
        Self {
            graph: Arc::new(graph),
            resolver,
            config: Arc::new(config),
        }
    }

    /// Returns the resource graph.
    pub fn graph(&self) -> &CatalogGraph {
        &self.graph
    }

    /// Returns the view resolver.
    pub fn resolver(&self) -> &ViewResolver {
        &self.resolver
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the storage backend name.
    pub fn backend_name(&self) -> &'static str {
        "memory"
    }
}
