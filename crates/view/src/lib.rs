//! # ztc-view - Field Selection and Relation Expansion
//!
//! This crate resolves the *view* of a resource: which of its fields a client
//! gets to see and which of its relations are embedded inline instead of
//! rendered as links. It implements the `fields` and `expand` query parameters
//! of the DSO API strategy independently of any ORM or web framework.
//!
//! ## Concepts
//!
//! - [`ResourceNode`] - ordered field map, the input and output tree
//! - [`RelationDescriptor`] - static declaration of a relation with its fetcher
//! - [`ExpansionSpec`] / [`FieldSpec`] - the per-request directives
//! - [`ViewResolver`] - applies the directives to a resource
//! - [`ResourceSchema`] - static shape of a resource kind, for checks that do not
//!   depend on fetched data
//!
//! ## Example
//!
//! ```rust
//! use futures::FutureExt;
//! use ztc_view::{
//!     Cardinality, ExpansionSpec, FieldSpec, FieldValue, Fetched, RelationDescriptor, Resource,
//!     ResourceNode, ViewResolver,
//! };
//!
//! # futures::executor::block_on(async {
//! let besluittypen = RelationDescriptor::from_fn("besluittypen", Cardinality::Many, || {
//!     async {
//!         let node = ResourceNode::new().with_field("besluittype_omschrijving", "Vergunning");
//!         Ok(Fetched::Many(vec![Resource::new(node)]))
//!     }
//!     .boxed()
//! });
//!
//! let catalogus = Resource::new(
//!     ResourceNode::new()
//!         .with_field("domein", "ABCDE")
//!         .with_field("besluittypen", FieldValue::link("/catalogussen/1/besluittypen")),
//! )
//! .with_relation(besluittypen);
//!
//! let expansion = ExpansionSpec::parse_paths(["besluittypen"]).unwrap();
//! let view = ViewResolver::new()
//!     .resolve_resource(catalogus, &expansion, &FieldSpec::all())
//!     .await
//!     .unwrap();
//!
//! assert!(view.get("besluittypen").unwrap().is_embedded());
//! # });
//! ```

#![warn(missing_docs)]

pub mod directive;
pub mod error;
pub mod node;
pub mod relation;
pub mod resolver;
pub mod schema;

pub use directive::{ExpansionPath, ExpansionSpec, FieldSpec, PathGroup};
pub use error::{FetchError, ViewError, ViewResult};
pub use node::{FieldValue, ResourceNode, Scalar};
pub use relation::{Cardinality, Fetched, FnFetcher, RelationDescriptor, RelationFetcher, Resource};
pub use resolver::ViewResolver;
pub use schema::{ResourceSchema, SchemaRelation};
