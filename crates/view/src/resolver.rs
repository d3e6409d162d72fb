//! The view resolver.
//!
//! Turns an entity snapshot plus the two request directives into the output
//! tree:
//!
//! 1. The [`FieldSpec`] narrows the root to the requested fields, kept in the
//!    entity's canonical order. Unknown names are rejected.
//! 2. The [`ExpansionSpec`] paths are grouped by first segment. Every group
//!    names a relation, which is fetched once and embedded; the remaining
//!    path segments are applied inside the embedded resource(s).
//! 3. Relations that no path names stay links.
//!
//! Below the root, a path segment naming a plain field selects that field, so
//! `besluittypen.besluittype_omschrijving` embeds each decision type with only
//! its description. Sibling relations are fetched concurrently; the output
//! order never depends on which fetch finishes first.
//!
//! Field names are checked against the data being resolved, which says nothing
//! below a relation that turns out empty. Relations declaring a
//! [`ResourceSchema`] target have their sub-paths checked against it before
//! the fetch, and [`ViewResolver::check`] checks a whole request against a
//! schema up front, e.g. before running a list query that may match nothing.

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use tracing::{debug, trace};

use crate::directive::{ExpansionPath, ExpansionSpec, FieldSpec};
use crate::error::{ViewError, ViewResult};
use crate::node::{FieldValue, ResourceNode, Scalar};
use crate::relation::{Cardinality, Fetched, RelationDescriptor, Resource};
use crate::schema::ResourceSchema;

/// Resolves field selection and relation expansion over resource graphs.
///
/// The resolver holds no per-request state and can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct ViewResolver {
    max_depth: Option<usize>,
}

impl ViewResolver {
    /// Creates a resolver without a depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects expansion paths with more than `max_depth` segments.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// The configured depth limit, if any.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Resolves one entity given as a node plus its relation table.
    pub async fn resolve(
        &self,
        root: ResourceNode,
        relations: &[RelationDescriptor],
        expansion: &ExpansionSpec,
        fields: &FieldSpec,
    ) -> ViewResult<ResourceNode> {
        let resource = Resource {
            node: root,
            relations: relations.to_vec(),
        };
        self.resolve_resource(resource, expansion, fields).await
    }

    /// Resolves one entity.
    pub async fn resolve_resource(
        &self,
        root: Resource,
        expansion: &ExpansionSpec,
        fields: &FieldSpec,
    ) -> ViewResult<ResourceNode> {
        self.check_depth(expansion)?;
        debug!(
            fields = ?fields.names(),
            expand_all = expansion.is_all(),
            depth = expansion.max_depth(),
            "Resolving view"
        );
        resolve_level(root, expansion.clone(), fields.clone(), String::new()).await
    }

    /// Resolves a list of entities with the same directives, keeping their order.
    pub async fn resolve_all(
        &self,
        roots: Vec<Resource>,
        expansion: &ExpansionSpec,
        fields: &FieldSpec,
    ) -> ViewResult<Vec<ResourceNode>> {
        self.check_depth(expansion)?;
        debug!(count = roots.len(), "Resolving view for collection");
        try_join_all(
            roots
                .into_iter()
                .map(|root| resolve_level(root, expansion.clone(), fields.clone(), String::new())),
        )
        .await
    }

    /// Checks the directives against the shape of the root kind without
    /// fetching anything.
    ///
    /// Reports the same errors a resolve of that kind would, for any data.
    pub fn check(
        &self,
        schema: &dyn ResourceSchema,
        expansion: &ExpansionSpec,
        fields: &FieldSpec,
    ) -> ViewResult<()> {
        self.check_depth(expansion)?;
        check_level(schema, expansion, fields, "")
    }

    fn check_depth(&self, expansion: &ExpansionSpec) -> ViewResult<()> {
        let (Some(max_depth), ExpansionSpec::Paths(paths)) = (self.max_depth, expansion) else {
            return Ok(());
        };
        match paths.iter().find(|p| p.depth() > max_depth) {
            Some(path) => Err(ViewError::PathTooDeep {
                path: path.to_string(),
                max_depth,
            }),
            None => Ok(()),
        }
    }
}

/// One relation to fetch at the current level.
struct Expansion {
    relation: RelationDescriptor,
    /// Directives to apply inside the embedded resource(s); empty for a plain
    /// expansion and always empty in expand-all mode.
    tails: Vec<ExpansionPath>,
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn resolve_level(
    resource: Resource,
    expansion: ExpansionSpec,
    fields: FieldSpec,
    prefix: String,
) -> BoxFuture<'static, ViewResult<ResourceNode>> {
    async move {
        for name in fields.names() {
            if !resource.has_field(name) {
                return Err(ViewError::UnknownField {
                    field: qualify(&prefix, name),
                });
            }
        }

        let plan = plan_expansions(&resource, &expansion, &fields, &prefix)?;

        let expanded = try_join_all(plan.into_iter().map(|step| {
            let path = qualify(&prefix, step.relation.name());
            expand_relation(step, path)
        }))
        .await?;

        let Resource { node, relations } = resource;
        let mut output = ResourceNode::with_capacity(node.len());
        let mut expanded: Vec<Option<(String, FieldValue)>> =
            expanded.into_iter().map(Some).collect();
        let mut take_expanded = |name: &str| {
            expanded
                .iter_mut()
                .find(|slot| matches!(slot, Some((n, _)) if n == name))
                .and_then(Option::take)
                .map(|(_, value)| value)
        };

        for (name, value) in node {
            if !fields.allows(&name) {
                continue;
            }
            let value = take_expanded(&name).unwrap_or(value);
            output.insert(name, value);
        }

        // Relations the provider left out of the node are appended when embedded.
        for relation in &relations {
            if let Some(value) = take_expanded(relation.name()) {
                output.insert(relation.name(), value);
            }
        }

        Ok(output)
    }
    .boxed()
}

fn plan_expansions(
    resource: &Resource,
    expansion: &ExpansionSpec,
    fields: &FieldSpec,
    prefix: &str,
) -> ViewResult<Vec<Expansion>> {
    let mut plan = Vec::new();

    match expansion {
        ExpansionSpec::All => {
            for relation in resource.relations.iter().filter(|r| r.is_expandable()) {
                if fields.allows(relation.name()) {
                    plan.push(Expansion {
                        relation: relation.clone(),
                        tails: Vec::new(),
                    });
                }
            }
        }
        ExpansionSpec::Paths(_) => {
            for group in expansion.group_by_head() {
                let full = qualify(prefix, &group.head);
                let relation = match resource.relation(&group.head) {
                    Some(relation) => relation,
                    None if resource.node.contains_field(&group.head) => {
                        let path = match group.tails.first() {
                            Some(tail) => format!("{full}.{tail}"),
                            None => full.clone(),
                        };
                        return Err(ViewError::AmbiguousPath { path, field: full });
                    }
                    None => return Err(ViewError::UnknownRelation { relation: full }),
                };

                if !relation.is_expandable() {
                    return Err(ViewError::NotExpandable { relation: full });
                }

                if !fields.allows(&group.head) {
                    trace!(relation = %full, "Relation not selected, skipping expansion");
                    continue;
                }

                if let Some(target) = relation.target() {
                    check_tails(target, &group.tails, &full)?;
                }

                plan.push(Expansion {
                    relation: relation.clone(),
                    tails: group.tails,
                });
            }
        }
    }

    Ok(plan)
}

async fn expand_relation(step: Expansion, path: String) -> ViewResult<(String, FieldValue)> {
    let Expansion { relation, tails } = step;
    debug!(relation = %path, cardinality = ?relation.cardinality(), "Fetching relation");

    let fetched = relation
        .fetch()
        .await
        .map_err(|source| ViewError::FetchFailure {
            relation: path.clone(),
            source,
        })?;

    let value = match (relation.cardinality(), fetched) {
        (Cardinality::One, Fetched::One(target)) => {
            FieldValue::EmbeddedSingle(resolve_nested(target, &tails, &path)?.await?)
        }
        (Cardinality::One, Fetched::Absent) => FieldValue::Scalar(Scalar::Null),
        (Cardinality::Many, Fetched::Many(targets)) => {
            let nested = targets
                .into_iter()
                .map(|target| resolve_nested(target, &tails, &path))
                .collect::<ViewResult<Vec<_>>>()?;
            FieldValue::EmbeddedMany(try_join_all(nested).await?)
        }
        (cardinality, other) => {
            return Err(ViewError::FetchFailure {
                relation: path,
                source: format!(
                    "fetcher returned {} for a {cardinality:?} relation",
                    describe(&other)
                )
                .into(),
            });
        }
    };

    Ok((relation.name().to_string(), value))
}

fn describe(fetched: &Fetched) -> &'static str {
    match fetched {
        Fetched::One(_) => "a single resource",
        Fetched::Absent => "no resource",
        Fetched::Many(_) => "a collection",
    }
}

/// Splits the path tails for an embedded resource into nested expansions and
/// a nested field selection, then returns the future resolving it.
///
/// A tail whose head is a relation is a nested expansion. A single-segment
/// tail naming a plain field selects that field; as soon as one field is
/// selected, the embedded node is narrowed to the selected fields plus the
/// relations being expanded.
fn resolve_nested(
    target: Resource,
    tails: &[ExpansionPath],
    path: &str,
) -> ViewResult<BoxFuture<'static, ViewResult<ResourceNode>>> {
    let mut nested_paths = Vec::new();
    let mut selected = Vec::new();
    let mut relation_heads = Vec::new();

    for tail in tails {
        let head = tail.head();
        if target.relation(head).is_some() {
            nested_paths.push(tail.clone());
            relation_heads.push(head.to_string());
        } else if target.node.contains_field(head) {
            if tail.depth() > 1 {
                return Err(ViewError::AmbiguousPath {
                    path: qualify(path, &tail.to_string()),
                    field: qualify(path, head),
                });
            }
            selected.push(head.to_string());
        } else {
            return Err(ViewError::UnknownField {
                field: qualify(path, head),
            });
        }
    }

    let fields = if selected.is_empty() {
        FieldSpec::all()
    } else {
        FieldSpec::only(selected.into_iter().chain(relation_heads))
    };

    Ok(resolve_level(
        target,
        ExpansionSpec::Paths(nested_paths),
        fields,
        path.to_string(),
    ))
}

// ============================================================================
// Checks against a schema
// ============================================================================

/// The schema counterpart of `resolve_level` and `plan_expansions`.
fn check_level(
    schema: &dyn ResourceSchema,
    expansion: &ExpansionSpec,
    fields: &FieldSpec,
    prefix: &str,
) -> ViewResult<()> {
    for name in fields.names() {
        if !schema.has_field(name) {
            return Err(ViewError::UnknownField {
                field: qualify(prefix, name),
            });
        }
    }

    if expansion.is_all() {
        return Ok(());
    }

    for group in expansion.group_by_head() {
        let full = qualify(prefix, &group.head);
        let relation = match schema.relation_schema(&group.head) {
            Some(relation) => relation,
            None if schema.has_field(&group.head) => {
                let path = match group.tails.first() {
                    Some(tail) => format!("{full}.{tail}"),
                    None => full.clone(),
                };
                return Err(ViewError::AmbiguousPath { path, field: full });
            }
            None => return Err(ViewError::UnknownRelation { relation: full }),
        };

        if !relation.expandable {
            return Err(ViewError::NotExpandable { relation: full });
        }

        if fields.allows(&group.head) {
            check_tails(relation.target, &group.tails, &full)?;
        }
    }

    Ok(())
}

/// The schema counterpart of `resolve_nested`.
fn check_tails(schema: &dyn ResourceSchema, tails: &[ExpansionPath], path: &str) -> ViewResult<()> {
    if tails.is_empty() {
        return Ok(());
    }

    let mut nested_paths = Vec::new();
    let mut selected = Vec::new();

    for tail in tails {
        let head = tail.head();
        if schema.relation_schema(head).is_some() {
            nested_paths.push(tail.clone());
            selected.push(head.to_string());
        } else if schema.has_field(head) {
            if tail.depth() > 1 {
                return Err(ViewError::AmbiguousPath {
                    path: qualify(path, &tail.to_string()),
                    field: qualify(path, head),
                });
            }
            selected.push(head.to_string());
        } else {
            return Err(ViewError::UnknownField {
                field: qualify(path, head),
            });
        }
    }

    // Relation heads count as selected so their groups below are checked.
    check_level(schema, &ExpansionSpec::Paths(nested_paths), &FieldSpec::only(selected), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::relation::RelationFetcher;
    use crate::schema::fixtures::TestSchema;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Returns a fixed result and counts how often it was asked to.
    struct StaticFetcher {
        calls: Arc<AtomicUsize>,
        result: Fetched,
        delay: Duration,
    }

    #[async_trait]
    impl RelationFetcher for StaticFetcher {
        async fn fetch(&self) -> Result<Fetched, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.result.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl RelationFetcher for FailingFetcher {
        async fn fetch(&self) -> Result<Fetched, FetchError> {
            Err("database unavailable".into())
        }
    }

    fn counted(
        name: &str,
        cardinality: Cardinality,
        result: Fetched,
        delay_ms: u64,
    ) -> (RelationDescriptor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = StaticFetcher {
            calls: Arc::clone(&calls),
            result,
            delay: Duration::from_millis(delay_ms),
        };
        (RelationDescriptor::new(name, cardinality, fetcher), calls)
    }

    fn catalogus_node() -> ResourceNode {
        ResourceNode::new()
            .with_field("url", FieldValue::link("http://testserver/catalogussen/1"))
            .with_field("domein", "ABCDE")
            .with_field("rsin", "123456789")
            .with_field("contactpersoon_beheer_naam", "Jan")
            .with_field(
                "besluittypen",
                FieldValue::link("http://testserver/catalogussen/1/besluittypen"),
            )
            .with_field(
                "informatieobjecttypen",
                FieldValue::link("http://testserver/catalogussen/1/informatieobjecttypen"),
            )
            .with_field(
                "eigenschappen",
                FieldValue::link("http://testserver/catalogussen/1/eigenschappen"),
            )
    }

    fn besluittype(id: u64, nested_calls: &Arc<AtomicUsize>) -> Resource {
        let catalogus = Resource::new(catalogus_node());
        let fetcher = StaticFetcher {
            calls: Arc::clone(nested_calls),
            result: Fetched::One(catalogus),
            delay: Duration::ZERO,
        };
        Resource::new(
            ResourceNode::new()
                .with_field("id", id)
                .with_field("besluittype_omschrijving", format!("Besluit {id}"))
                .with_field("toelichting", Scalar::Null)
                .with_field(
                    "maakt_deel_uit_van",
                    FieldValue::link("http://testserver/catalogussen/1"),
                ),
        )
        .with_relation(RelationDescriptor::new(
            "maakt_deel_uit_van",
            Cardinality::One,
            fetcher,
        ))
    }

    struct Fixture {
        root: Resource,
        besluittypen_calls: Arc<AtomicUsize>,
        iot_calls: Arc<AtomicUsize>,
        nested_calls: Arc<AtomicUsize>,
    }

    fn fixture() -> Fixture {
        let nested_calls = Arc::new(AtomicUsize::new(0));
        let (besluittypen, besluittypen_calls) = counted(
            "besluittypen",
            Cardinality::Many,
            Fetched::Many(vec![besluittype(10, &nested_calls), besluittype(11, &nested_calls)]),
            0,
        );
        let (iot, iot_calls) = counted(
            "informatieobjecttypen",
            Cardinality::Many,
            Fetched::Many(vec![Resource::new(
                ResourceNode::new().with_field("omschrijving", "Brief"),
            )]),
            0,
        );
        let (eigenschappen, _) = counted(
            "eigenschappen",
            Cardinality::Many,
            Fetched::Many(Vec::new()),
            0,
        );

        let root = Resource::new(catalogus_node())
            .with_relation(besluittypen)
            .with_relation(iot)
            .with_relation(eigenschappen.not_expandable());

        Fixture {
            root,
            besluittypen_calls,
            iot_calls,
            nested_calls,
        }
    }

    fn paths(raw: &[&str]) -> ExpansionSpec {
        ExpansionSpec::parse_paths(raw.iter().copied()).unwrap()
    }

    async fn resolve(root: Resource, expansion: ExpansionSpec, fields: FieldSpec) -> ViewResult<ResourceNode> {
        ViewResolver::new()
            .resolve_resource(root, &expansion, &fields)
            .await
    }

    fn embedded_ids(value: &FieldValue) -> Vec<u64> {
        value
            .as_embedded_many()
            .expect("embedded collection")
            .iter()
            .map(|node| match node.get("id") {
                Some(FieldValue::Scalar(Scalar::Number(n))) => n.as_u64().unwrap(),
                other => panic!("unexpected id: {other:?}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_relations_stay_links_without_expansion() {
        let f = fixture();
        let node = resolve(f.root, ExpansionSpec::none(), FieldSpec::all())
            .await
            .unwrap();

        assert!(node.get("besluittypen").unwrap().is_link());
        assert!(node.get("informatieobjecttypen").unwrap().is_link());
        assert_eq!(f.besluittypen_calls.load(Ordering::SeqCst), 0);
        assert_eq!(node.len(), 7);
    }

    #[tokio::test]
    async fn test_expand_many_relation_in_fetch_order() {
        let f = fixture();
        let node = resolve(f.root, paths(&["besluittypen"]), FieldSpec::all())
            .await
            .unwrap();

        let besluittypen = node.get("besluittypen").unwrap();
        assert_eq!(embedded_ids(besluittypen), vec![10, 11]);
        // The embedded nodes keep all their fields and their own relations stay links.
        let first = &besluittypen.as_embedded_many().unwrap()[0];
        assert_eq!(first.len(), 4);
        assert!(first.get("maakt_deel_uit_van").unwrap().is_link());
        assert!(node.get("informatieobjecttypen").unwrap().is_link());
        assert_eq!(f.besluittypen_calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.iot_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_field_selection() {
        let f = fixture();
        let node = resolve(f.root, ExpansionSpec::none(), FieldSpec::only(["domein"]))
            .await
            .unwrap();

        assert_eq!(node.len(), 1);
        assert_eq!(node.get("domein"), Some(&FieldValue::from("ABCDE")));
    }

    #[tokio::test]
    async fn test_field_selection_uses_canonical_order() {
        let f = fixture();
        let node = resolve(
            f.root,
            ExpansionSpec::none(),
            FieldSpec::only(["rsin", "url", "domein"]),
        )
        .await
        .unwrap();

        let names: Vec<_> = node.field_names().collect();
        assert_eq!(names, vec!["url", "domein", "rsin"]);
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let f = fixture();
        let err = resolve(f.root, ExpansionSpec::none(), FieldSpec::only(["domein", "foobar"]))
            .await
            .unwrap_err();

        assert!(matches!(&err, ViewError::UnknownField { field } if field == "foobar"));
    }

    #[tokio::test]
    async fn test_overlapping_paths_fetch_once() {
        let f = fixture();
        let node = resolve(
            f.root,
            paths(&["besluittypen", "besluittypen.besluittype_omschrijving"]),
            FieldSpec::all(),
        )
        .await
        .unwrap();

        assert_eq!(f.besluittypen_calls.load(Ordering::SeqCst), 1);
        let embedded = node.get("besluittypen").unwrap().as_embedded_many().unwrap();
        assert_eq!(embedded.len(), 2);
        for item in embedded {
            let names: Vec<_> = item.field_names().collect();
            assert_eq!(names, vec!["besluittype_omschrijving"]);
        }
    }

    #[tokio::test]
    async fn test_nested_field_on_single_relation() {
        let nested_calls = Arc::new(AtomicUsize::new(0));
        let root = besluittype(10, &nested_calls);

        let node = resolve(root, paths(&["maakt_deel_uit_van.domein"]), FieldSpec::all())
            .await
            .unwrap();

        // The root keeps all of its own fields.
        assert_eq!(node.len(), 4);
        let catalogus = node
            .get("maakt_deel_uit_van")
            .unwrap()
            .as_embedded_single()
            .unwrap();
        let names: Vec<_> = catalogus.field_names().collect();
        assert_eq!(names, vec!["domein"]);
        assert_eq!(nested_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_root_fields_and_nested_paths_are_independent() {
        let nested_calls = Arc::new(AtomicUsize::new(0));
        let root = besluittype(10, &nested_calls);

        let node = resolve(
            root,
            paths(&["maakt_deel_uit_van.rsin"]),
            FieldSpec::only(["maakt_deel_uit_van"]),
        )
        .await
        .unwrap();

        assert_eq!(node.len(), 1);
        let catalogus = node
            .get("maakt_deel_uit_van")
            .unwrap()
            .as_embedded_single()
            .unwrap();
        assert_eq!(catalogus.len(), 1);
        assert!(catalogus.contains_field("rsin"));
    }

    #[tokio::test]
    async fn test_nested_relation_expansion() {
        let f = fixture();
        let node = resolve(
            f.root,
            paths(&["besluittypen.maakt_deel_uit_van"]),
            FieldSpec::all(),
        )
        .await
        .unwrap();

        for item in node.get("besluittypen").unwrap().as_embedded_many().unwrap() {
            // No field was selected below besluittypen, so everything stays.
            assert_eq!(item.len(), 4);
            assert!(item.get("maakt_deel_uit_van").unwrap().is_embedded());
        }
        // One fetch per embedded decision type.
        assert_eq!(f.nested_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_nested_selection_keeps_expanded_relations() {
        let f = fixture();
        let node = resolve(
            f.root,
            paths(&[
                "besluittypen.maakt_deel_uit_van",
                "besluittypen.besluittype_omschrijving",
            ]),
            FieldSpec::all(),
        )
        .await
        .unwrap();

        let first = &node.get("besluittypen").unwrap().as_embedded_many().unwrap()[0];
        let names: Vec<_> = first.field_names().collect();
        assert_eq!(names, vec!["besluittype_omschrijving", "maakt_deel_uit_van"]);
    }

    #[tokio::test]
    async fn test_expand_all_is_one_level_deep() {
        let f = fixture();
        let node = resolve(f.root, ExpansionSpec::All, FieldSpec::all())
            .await
            .unwrap();

        assert!(node.get("besluittypen").unwrap().is_embedded());
        assert!(node.get("informatieobjecttypen").unwrap().is_embedded());
        // Not expandable, stays a link.
        assert!(node.get("eigenschappen").unwrap().is_link());

        let first = &node.get("besluittypen").unwrap().as_embedded_many().unwrap()[0];
        assert!(first.get("maakt_deel_uit_van").unwrap().is_link());
        assert_eq!(f.nested_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expand_all_respects_field_selection() {
        let f = fixture();
        let node = resolve(f.root, ExpansionSpec::All, FieldSpec::only(["domein", "besluittypen"]))
            .await
            .unwrap();

        assert_eq!(node.len(), 2);
        assert!(node.get("besluittypen").unwrap().is_embedded());
        assert_eq!(f.iot_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unselected_relation_is_not_fetched() {
        let f = fixture();
        let node = resolve(f.root, paths(&["besluittypen"]), FieldSpec::only(["rsin"]))
            .await
            .unwrap();

        assert_eq!(node.len(), 1);
        assert_eq!(f.besluittypen_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_expandable_relation() {
        let f = fixture();
        let err = resolve(f.root, paths(&["eigenschappen"]), FieldSpec::all())
            .await
            .unwrap_err();

        assert!(matches!(&err, ViewError::NotExpandable { relation } if relation == "eigenschappen"));
    }

    #[tokio::test]
    async fn test_unknown_relation() {
        let f = fixture();
        let err = resolve(f.root, paths(&["zaaktypen"]), FieldSpec::all())
            .await
            .unwrap_err();

        assert!(matches!(&err, ViewError::UnknownRelation { relation } if relation == "zaaktypen"));
    }

    #[tokio::test]
    async fn test_path_through_scalar_is_ambiguous() {
        let f = fixture();
        let err = resolve(f.root, paths(&["domein.x"]), FieldSpec::all())
            .await
            .unwrap_err();

        match err {
            ViewError::AmbiguousPath { path, field } => {
                assert_eq!(path, "domein.x");
                assert_eq!(field, "domein");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_nested_field_is_qualified() {
        let f = fixture();
        let err = resolve(f.root, paths(&["besluittypen.foo"]), FieldSpec::all())
            .await
            .unwrap_err();

        assert!(matches!(&err, ViewError::UnknownField { field } if field == "besluittypen.foo"));
    }

    #[tokio::test]
    async fn test_nested_path_through_scalar() {
        let f = fixture();
        let err = resolve(
            f.root,
            paths(&["besluittypen.toelichting.tekst"]),
            FieldSpec::all(),
        )
        .await
        .unwrap_err();

        assert!(matches!(&err, ViewError::AmbiguousPath { field, .. } if field == "besluittypen.toelichting"));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let root = Resource::new(catalogus_node()).with_relation(RelationDescriptor::new(
            "besluittypen",
            Cardinality::Many,
            FailingFetcher,
        ));

        let err = resolve(root, paths(&["besluittypen"]), FieldSpec::all())
            .await
            .unwrap_err();

        assert!(!err.is_client_error());
        assert_eq!(err.subject(), "besluittypen");
        assert!(err.to_string().contains("database unavailable"));
    }

    #[tokio::test]
    async fn test_cardinality_mismatch_is_a_fetch_failure() {
        let (relation, _) = counted("besluittypen", Cardinality::Many, Fetched::Absent, 0);
        let root = Resource::new(catalogus_node()).with_relation(relation);

        let err = resolve(root, paths(&["besluittypen"]), FieldSpec::all())
            .await
            .unwrap_err();

        assert!(matches!(err, ViewError::FetchFailure { .. }));
    }

    #[tokio::test]
    async fn test_absent_single_relation_renders_null() {
        let (relation, calls) = counted("specificatie_van_eigenschap", Cardinality::One, Fetched::Absent, 0);
        let root = Resource::new(
            ResourceNode::new()
                .with_field("eigenschapnaam", "kleur")
                .with_field("specificatie_van_eigenschap", Scalar::Null),
        )
        .with_relation(relation);

        let node = resolve(root, paths(&["specificatie_van_eigenschap"]), FieldSpec::all())
            .await
            .unwrap();

        assert_eq!(
            node.get("specificatie_van_eigenschap"),
            Some(&FieldValue::Scalar(Scalar::Null))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_output_order_independent_of_fetch_completion() {
        let (slow, _) = counted(
            "besluittypen",
            Cardinality::Many,
            Fetched::Many(Vec::new()),
            30,
        );
        let (fast, _) = counted(
            "informatieobjecttypen",
            Cardinality::Many,
            Fetched::Many(Vec::new()),
            0,
        );
        let root = Resource::new(catalogus_node())
            .with_relation(slow)
            .with_relation(fast);

        let node = resolve(
            root,
            paths(&["informatieobjecttypen", "besluittypen"]),
            FieldSpec::all(),
        )
        .await
        .unwrap();

        let names: Vec<_> = node.field_names().collect();
        assert_eq!(
            names,
            vec![
                "url",
                "domein",
                "rsin",
                "contactpersoon_beheer_naam",
                "besluittypen",
                "informatieobjecttypen",
                "eigenschappen",
            ]
        );
    }

    #[tokio::test]
    async fn test_relation_missing_from_node_is_appended_when_expanded() {
        let (relation, _) = counted(
            "besluittypen",
            Cardinality::Many,
            Fetched::Many(Vec::new()),
            0,
        );
        let root = Resource::new(ResourceNode::new().with_field("rsin", "123456789"))
            .with_relation(relation);

        let node = resolve(root, paths(&["besluittypen"]), FieldSpec::all())
            .await
            .unwrap();

        let names: Vec<_> = node.field_names().collect();
        assert_eq!(names, vec!["rsin", "besluittypen"]);
    }

    #[tokio::test]
    async fn test_max_depth() {
        let f = fixture();
        let err = ViewResolver::new()
            .with_max_depth(1)
            .resolve_resource(
                f.root,
                &paths(&["besluittypen.maakt_deel_uit_van"]),
                &FieldSpec::all(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ViewError::PathTooDeep { max_depth: 1, .. }));
        assert_eq!(f.besluittypen_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_with_separate_relation_table() {
        let f = fixture();
        let Resource { node, relations } = f.root;

        let resolved = ViewResolver::new()
            .resolve(node, &relations, &paths(&["informatieobjecttypen"]), &FieldSpec::all())
            .await
            .unwrap();

        assert!(resolved.get("informatieobjecttypen").unwrap().is_embedded());
        assert_eq!(f.iot_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_order() {
        let nested_calls = Arc::new(AtomicUsize::new(0));
        let roots = vec![besluittype(3, &nested_calls), besluittype(1, &nested_calls)];

        let nodes = ViewResolver::new()
            .resolve_all(roots, &ExpansionSpec::none(), &FieldSpec::only(["id"]))
            .await
            .unwrap();

        let ids = embedded_ids(&FieldValue::EmbeddedMany(nodes));
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_relation_missing_from_node_is_omitted_when_not_expanded() {
        let (relation, calls) = counted(
            "besluittypen",
            Cardinality::Many,
            Fetched::Many(Vec::new()),
            0,
        );
        let root = Resource::new(ResourceNode::new().with_field("rsin", "123456789"))
            .with_relation(relation);

        let node = resolve(root, ExpansionSpec::none(), FieldSpec::all())
            .await
            .unwrap();

        let names: Vec<_> = node.field_names().collect();
        assert_eq!(names, vec!["rsin"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    // ------------------------------------------------------------------------
    // Schema checks
    // ------------------------------------------------------------------------

    fn catalogus_with_empty_besluittypen() -> (Resource, Arc<AtomicUsize>) {
        let (besluittypen, calls) = counted(
            "besluittypen",
            Cardinality::Many,
            Fetched::Many(Vec::new()),
            0,
        );
        let root = Resource::new(catalogus_node())
            .with_relation(besluittypen.with_target(&TestSchema::BesluitType));
        (root, calls)
    }

    #[tokio::test]
    async fn test_unknown_nested_field_rejected_for_empty_relation() {
        let (root, calls) = catalogus_with_empty_besluittypen();
        let err = resolve(root, paths(&["besluittypen.foobar"]), FieldSpec::all())
            .await
            .unwrap_err();

        assert!(matches!(&err, ViewError::UnknownField { field } if field == "besluittypen.foobar"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_known_nested_field_accepted_for_empty_relation() {
        let (root, _) = catalogus_with_empty_besluittypen();
        let node = resolve(
            root,
            paths(&["besluittypen.besluittype_omschrijving", "besluittypen.maakt_deel_uit_van.domein"]),
            FieldSpec::all(),
        )
        .await
        .unwrap();

        assert_eq!(node.get("besluittypen").unwrap().as_embedded_many().unwrap().len(), 0);
    }

    #[test]
    fn test_schema_check_follows_relation_targets() {
        let resolver = ViewResolver::new();
        let schema = TestSchema::Catalogus;

        let fields = FieldSpec::only(["domein", "besluittypen"]);
        let expansion = paths(&["besluittypen.maakt_deel_uit_van.rsin"]);
        assert!(resolver.check(&schema, &expansion, &fields).is_ok());
        assert!(resolver.check(&schema, &ExpansionSpec::All, &FieldSpec::all()).is_ok());

        let err = resolver
            .check(&schema, &ExpansionSpec::none(), &FieldSpec::only(["foobar"]))
            .unwrap_err();
        assert!(matches!(&err, ViewError::UnknownField { field } if field == "foobar"));

        let expansion = paths(&["besluittypen.maakt_deel_uit_van.foobar"]);
        let err = resolver.check(&schema, &expansion, &FieldSpec::all()).unwrap_err();
        let ViewError::UnknownField { field } = &err else {
            panic!("expected an unknown field, got {err:?}");
        };
        assert_eq!(field, "besluittypen.maakt_deel_uit_van.foobar");

        let err = resolver
            .check(&schema, &paths(&["besluittypen.toelichting.x"]), &FieldSpec::all())
            .unwrap_err();
        assert!(matches!(err, ViewError::AmbiguousPath { .. }));

        let err = resolver.check(&schema, &paths(&["domein"]), &FieldSpec::all()).unwrap_err();
        assert!(matches!(err, ViewError::AmbiguousPath { .. }));

        let err = resolver.check(&schema, &paths(&["zaaktypen"]), &FieldSpec::all()).unwrap_err();
        assert!(matches!(err, ViewError::UnknownRelation { .. }));
    }

    #[test]
    fn test_schema_check_applies_depth_limit() {
        let expansion = paths(&["besluittypen.maakt_deel_uit_van"]);
        let err = ViewResolver::new()
            .with_max_depth(1)
            .check(&TestSchema::Catalogus, &expansion, &FieldSpec::all())
            .unwrap_err();
        assert!(matches!(err, ViewError::PathTooDeep { .. }));
    }
}
