//! Relation descriptors and fetchers.
//!
//! Each entity type declares its relations statically as a table of
//! [`RelationDescriptor`]s. A descriptor names the relation, states its
//! cardinality and whether clients may expand it, and owns a
//! [`RelationFetcher`] that lazily loads the related resource(s) when an
//! expansion asks for them.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::FetchError;
use crate::node::ResourceNode;
use crate::schema::ResourceSchema;

/// How many resources a relation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one related resource.
    One,
    /// An ordered collection of related resources.
    Many,
}

/// The result of fetching a relation.
#[derive(Debug, Clone)]
pub enum Fetched {
    /// The single related resource.
    One(Resource),
    /// A nullable to-one relation with no target.
    Absent,
    /// The related resources, in provider order.
    Many(Vec<Resource>),
}

/// Loads the target(s) of one relation of one entity.
///
/// Implementations may perform I/O. They are called at most once per relation
/// per resolve call and must not rely on being called at all.
#[async_trait]
pub trait RelationFetcher: Send + Sync {
    /// Fetches the related resource(s).
    async fn fetch(&self) -> Result<Fetched, FetchError>;
}

type FetchFn = dyn Fn() -> BoxFuture<'static, Result<Fetched, FetchError>> + Send + Sync;

/// A [`RelationFetcher`] backed by a closure returning a boxed future.
pub struct FnFetcher {
    f: Box<FetchFn>,
}

impl FnFetcher {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<Fetched, FetchError>> + Send + Sync + 'static,
    {
        Self { f: Box::new(f) }
    }
}

#[async_trait]
impl RelationFetcher for FnFetcher {
    async fn fetch(&self) -> Result<Fetched, FetchError> {
        (self.f)().await
    }
}

/// Static description of one relation of an entity type.
#[derive(Clone)]
pub struct RelationDescriptor {
    name: String,
    cardinality: Cardinality,
    expandable: bool,
    target: Option<&'static dyn ResourceSchema>,
    fetcher: Arc<dyn RelationFetcher>,
}

impl RelationDescriptor {
    /// Creates an expandable relation.
    pub fn new(
        name: impl Into<String>,
        cardinality: Cardinality,
        fetcher: impl RelationFetcher + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            cardinality,
            expandable: true,
            target: None,
            fetcher: Arc::new(fetcher),
        }
    }

    /// Creates an expandable relation from a closure.
    pub fn from_fn<F>(name: impl Into<String>, cardinality: Cardinality, f: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<Fetched, FetchError>> + Send + Sync + 'static,
    {
        Self::new(name, cardinality, FnFetcher::new(f))
    }

    /// Marks the relation as not expandable; it always renders as a link.
    pub fn not_expandable(mut self) -> Self {
        self.expandable = false;
        self
    }

    /// Declares the shape of the related resource(s).
    ///
    /// Expansion paths continuing below this relation are then checked against
    /// `schema` before the fetcher runs, also when it returns nothing.
    pub fn with_target(mut self, schema: &'static dyn ResourceSchema) -> Self {
        self.target = Some(schema);
        self
    }

    /// The declared shape of the related resource(s), if any.
    pub fn target(&self) -> Option<&'static dyn ResourceSchema> {
        self.target
    }

    /// The relation name, unique per entity type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The relation's cardinality.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Whether clients may expand the relation.
    pub fn is_expandable(&self) -> bool {
        self.expandable
    }

    /// Runs the fetcher.
    pub async fn fetch(&self) -> Result<Fetched, FetchError> {
        self.fetcher.fetch().await
    }
}

impl fmt::Debug for RelationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationDescriptor")
            .field("name", &self.name)
            .field("cardinality", &self.cardinality)
            .field("expandable", &self.expandable)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// An entity snapshot together with its relation table.
///
/// The node holds the entity's fields in canonical order. Every relation in
/// the table must also be a field of the node, holding its link (or `null`
/// for an empty to-one relation): the resolver renders a relation that is not
/// expanded from the node, so one missing there is left out of the output.
#[derive(Debug, Clone, Default)]
pub struct Resource {
    /// The entity's fields.
    pub node: ResourceNode,
    /// The entity's relations.
    pub relations: Vec<RelationDescriptor>,
}

impl Resource {
    /// Creates a resource without relations.
    pub fn new(node: ResourceNode) -> Self {
        Self {
            node,
            relations: Vec::new(),
        }
    }

    /// Adds a relation.
    pub fn with_relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    /// Looks up a relation by name.
    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.iter().find(|r| r.name() == name)
    }

    /// Returns true if `name` is a field of the entity or one of its relations.
    pub fn has_field(&self, name: &str) -> bool {
        self.node.contains_field(name) || self.relation(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[tokio::test]
    async fn test_fn_fetcher() {
        let relation = RelationDescriptor::from_fn("maakt_deel_uit_van", Cardinality::One, || {
            async {
                Ok(Fetched::One(Resource::new(
                    ResourceNode::new().with_field("domein", "ABCDE"),
                )))
            }
            .boxed()
        });

        assert!(relation.is_expandable());
        match relation.fetch().await.unwrap() {
            Fetched::One(resource) => assert!(resource.has_field("domein")),
            other => panic!("unexpected fetch result: {other:?}"),
        }
    }

    #[test]
    fn test_lookup_relation() {
        let relation =
            RelationDescriptor::from_fn("eigenschappen", Cardinality::Many, || {
                async { Ok(Fetched::Many(Vec::new())) }.boxed()
            })
            .not_expandable();
        let resource = Resource::new(ResourceNode::new().with_field("rsin", "123456789"))
            .with_relation(relation);

        assert!(resource.has_field("rsin"));
        assert!(resource.has_field("eigenschappen"));
        assert!(!resource.relation("eigenschappen").unwrap().is_expandable());
        assert!(resource.relation("besluittypen").is_none());
    }
}
