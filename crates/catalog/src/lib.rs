//! # ztc-catalog - Catalog Datamodel and Resource Graph
//!
//! The reference data behind the ZTC registry: catalogs and the decision
//! types, information object types and properties defined in them.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`model`] | Row types as stored and seeded |
//! | [`validation`] | Row-level rules |
//! | [`store`] | Thread-safe in-memory store with referential checks |
//! | [`kind`] | Canonical fields, relations, filter and search fields per kind |
//! | [`graph`] | Rows to resolver resources, with lazy relation fetchers |
//! | [`query`] | Filtering, sorting and search for list requests |
//! | [`seed`] | JSON seed files |
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ztc_catalog::{CatalogGraph, CatalogQuery, CatalogSeed};
//!
//! let seed: CatalogSeed = serde_json::from_str(r#"{
//!     "catalogussen": [{"id": 1, "domein": "ABCDE", "rsin": "123456789",
//!                       "contactpersoon_beheer_naam": "Jan"}]
//! }"#).unwrap();
//! let graph = CatalogGraph::new(Arc::new(seed.into_store().unwrap()), "http://localhost:8080");
//!
//! let catalogussen = graph.catalogussen(&CatalogQuery::new()).unwrap();
//! assert_eq!(catalogussen.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod graph;
pub mod kind;
#[allow(missing_docs)]
pub mod model;
pub mod query;
pub mod seed;
pub mod store;
pub mod validation;

pub use error::{CatalogError, CatalogResult};
pub use graph::CatalogGraph;
pub use kind::{RelationSpec, RelationTarget, ResourceKind, SubResource};
pub use model::{
    BesluitType, Catalogus, Eigenschap, EigenschapReferentie, EigenschapSpecificatie, Formaat,
    InformatieObjectType, JaNee, VertrouwelijkheidAanduiding,
};
pub use query::{CatalogQuery, QueryError, SortDirection, SortKey};
pub use seed::CatalogSeed;
pub use store::CatalogStore;
pub use validation::{Validate, ValidationError};
