//! Resource kinds exposed by the registry.
//!
//! Every top-level kind has a static table describing its canonical scalar
//! fields, its relations and the fields the query layer accepts for filtering
//! and searching. The tables are the single source the graph provider, the
//! query layer and the transport layer agree on.

use std::fmt;

use ztc_view::{Cardinality, ResourceSchema, SchemaRelation};

use RelationTarget::{Kind, Sub};

/// Static declaration of a relation of a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationSpec {
    /// Relation name as it appears in responses and expansion paths.
    pub name: &'static str,
    /// One or many targets.
    pub cardinality: Cardinality,
    /// Whether clients may expand it.
    pub expandable: bool,
    /// What it points at.
    pub target: RelationTarget,
}

/// The kind of resource a relation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationTarget {
    /// A top-level kind.
    Kind(ResourceKind),
    /// An embedded-only resource.
    Sub(SubResource),
}

impl RelationTarget {
    /// The target's shape, for checking expansion paths below the relation.
    pub fn schema(self) -> &'static dyn ResourceSchema {
        match self {
            RelationTarget::Kind(kind) => kind.schema(),
            RelationTarget::Sub(SubResource::Specificatie) => &SubResource::Specificatie,
            RelationTarget::Sub(SubResource::Referentie) => &SubResource::Referentie,
        }
    }
}

const fn relation(
    name: &'static str,
    cardinality: Cardinality,
    expandable: bool,
    target: RelationTarget,
) -> RelationSpec {
    RelationSpec {
        name,
        cardinality,
        expandable,
        target,
    }
}

const CATALOGUS_FIELDS: &[&str] = &[
    "url",
    "domein",
    "rsin",
    "contactpersoon_beheer_naam",
    "contactpersoon_beheer_telefoonnummer",
    "contactpersoon_beheer_emailadres",
];

const CATALOGUS_RELATIONS: &[RelationSpec] = &[
    relation("besluittypen", Cardinality::Many, true, Kind(ResourceKind::BesluitType)),
    relation(
        "informatieobjecttypen",
        Cardinality::Many,
        true,
        Kind(ResourceKind::InformatieObjectType),
    ),
    relation("eigenschappen", Cardinality::Many, true, Kind(ResourceKind::Eigenschap)),
];

const BESLUITTYPE_FIELDS: &[&str] = &[
    "url",
    "besluittype_omschrijving",
    "besluittype_omschrijving_generiek",
    "besluitcategorie",
    "reactietermijn",
    "publicatie_indicatie",
    "publicatietekst",
    "publicatietermijn",
    "toelichting",
    "datum_begin_geldigheid",
    "datum_einde_geldigheid",
];

const BESLUITTYPE_RELATIONS: &[RelationSpec] = &[
    relation("maakt_deel_uit_van", Cardinality::One, true, Kind(ResourceKind::Catalogus)),
    relation(
        "wordt_vastgelegd_in",
        Cardinality::Many,
        true,
        Kind(ResourceKind::InformatieObjectType),
    ),
];

const INFORMATIEOBJECTTYPE_FIELDS: &[&str] = &[
    "url",
    "omschrijving",
    "omschrijvingGeneriek",
    "categorie",
    "trefwoord",
    "vertrouwelijkAanduiding",
    "model",
    "toelichting",
    "ingangsdatumObject",
    "einddatumObject",
];

const INFORMATIEOBJECTTYPE_RELATIONS: &[RelationSpec] = &[
    relation("maaktDeeluitVan", Cardinality::One, true, Kind(ResourceKind::Catalogus)),
    relation("isVastleggingVoor", Cardinality::Many, true, Kind(ResourceKind::BesluitType)),
];

const EIGENSCHAP_FIELDS: &[&str] = &[
    "url",
    "eigenschapnaam",
    "definitie",
    "toelichting",
    "datum_begin_geldigheid",
    "datum_einde_geldigheid",
];

const EIGENSCHAP_RELATIONS: &[RelationSpec] = &[
    relation(
        "specificatie_van_eigenschap",
        Cardinality::One,
        true,
        Sub(SubResource::Specificatie),
    ),
    relation(
        "referentie_naar_eigenschap",
        Cardinality::One,
        true,
        Sub(SubResource::Referentie),
    ),
    relation("maakt_deel_uit_van", Cardinality::One, false, Kind(ResourceKind::Catalogus)),
];

const SPECIFICATIE_FIELDS: &[&str] = &[
    "groep",
    "formaat",
    "lengte",
    "kardinaliteit",
    "waardenverzameling",
];

const REFERENTIE_FIELDS: &[&str] = &[
    "objecttype",
    "informatiemodel",
    "namespace",
    "schemalocatie",
    "x_path_element",
    "entiteittype",
];

/// Top-level resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A catalog.
    Catalogus,
    /// A decision type, nested under a catalog.
    BesluitType,
    /// An information object type, nested under a catalog.
    InformatieObjectType,
    /// A case property, nested under a catalog.
    Eigenschap,
}

impl ResourceKind {
    /// The kinds served as collections below a catalog.
    pub const NESTED: [ResourceKind; 3] = [
        ResourceKind::BesluitType,
        ResourceKind::InformatieObjectType,
        ResourceKind::Eigenschap,
    ];

    /// Singular name, used in log lines and error messages.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Catalogus => "catalogus",
            ResourceKind::BesluitType => "besluittype",
            ResourceKind::InformatieObjectType => "informatieobjecttype",
            ResourceKind::Eigenschap => "eigenschap",
        }
    }

    /// Collection path segment.
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Catalogus => "catalogussen",
            ResourceKind::BesluitType => "besluittypen",
            ResourceKind::InformatieObjectType => "informatieobjecttypen",
            ResourceKind::Eigenschap => "eigenschappen",
        }
    }

    /// Resolves a collection path segment.
    pub fn from_collection(segment: &str) -> Option<Self> {
        match segment {
            "catalogussen" => Some(ResourceKind::Catalogus),
            "besluittypen" => Some(ResourceKind::BesluitType),
            "informatieobjecttypen" => Some(ResourceKind::InformatieObjectType),
            "eigenschappen" => Some(ResourceKind::Eigenschap),
            _ => None,
        }
    }

    /// Scalar fields in canonical order. Relations follow them in responses.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Catalogus => CATALOGUS_FIELDS,
            ResourceKind::BesluitType => BESLUITTYPE_FIELDS,
            ResourceKind::InformatieObjectType => INFORMATIEOBJECTTYPE_FIELDS,
            ResourceKind::Eigenschap => EIGENSCHAP_FIELDS,
        }
    }

    /// Declared relations in canonical order.
    pub fn relations(self) -> &'static [RelationSpec] {
        match self {
            ResourceKind::Catalogus => CATALOGUS_RELATIONS,
            ResourceKind::BesluitType => BESLUITTYPE_RELATIONS,
            ResourceKind::InformatieObjectType => INFORMATIEOBJECTTYPE_RELATIONS,
            ResourceKind::Eigenschap => EIGENSCHAP_RELATIONS,
        }
    }

    /// Looks up a relation by name.
    pub fn relation(self, name: &str) -> Option<&'static RelationSpec> {
        self.relations().iter().find(|r| r.name == name)
    }

    /// Fields accepted as exact-match list filters.
    pub fn filterable_fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Catalogus => &["rsin", "domein"],
            ResourceKind::BesluitType => &["besluitcategorie", "publicatie_indicatie"],
            ResourceKind::InformatieObjectType => &["categorie", "vertrouwelijkAanduiding"],
            ResourceKind::Eigenschap => &["eigenschapnaam"],
        }
    }

    /// Fields matched by free-text search.
    pub fn searchable_fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Catalogus => &["domein", "rsin", "contactpersoon_beheer_naam"],
            ResourceKind::BesluitType => &[
                "besluittype_omschrijving",
                "besluittype_omschrijving_generiek",
                "besluitcategorie",
            ],
            ResourceKind::InformatieObjectType => &["omschrijving", "omschrijvingGeneriek", "categorie"],
            ResourceKind::Eigenschap => &["eigenschapnaam", "definitie"],
        }
    }

    /// Returns true when `field` can be used as a sort key.
    pub fn is_sortable(self, field: &str) -> bool {
        self.fields().contains(&field)
    }

    /// The kind's shape, for checking request directives.
    pub fn schema(self) -> &'static dyn ResourceSchema {
        match self {
            ResourceKind::Catalogus => &ResourceKind::Catalogus,
            ResourceKind::BesluitType => &ResourceKind::BesluitType,
            ResourceKind::InformatieObjectType => &ResourceKind::InformatieObjectType,
            ResourceKind::Eigenschap => &ResourceKind::Eigenschap,
        }
    }
}

impl ResourceSchema for ResourceKind {
    fn has_field(&self, name: &str) -> bool {
        self.fields().contains(&name) || ResourceKind::relation(*self, name).is_some()
    }

    fn relation_schema(&self, name: &str) -> Option<SchemaRelation> {
        ResourceKind::relation(*self, name).map(|spec| SchemaRelation {
            expandable: spec.expandable,
            target: spec.target.schema(),
        })
    }
}

/// Resources that only exist embedded in an eigenschap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubResource {
    /// The value specification.
    Specificatie,
    /// The reference to an external property.
    Referentie,
}

impl SubResource {
    /// Fields in canonical order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            SubResource::Specificatie => SPECIFICATIE_FIELDS,
            SubResource::Referentie => REFERENTIE_FIELDS,
        }
    }
}

impl ResourceSchema for SubResource {
    fn has_field(&self, name: &str) -> bool {
        self.fields().contains(&name)
    }

    fn relation_schema(&self, _name: &str) -> Option<SchemaRelation> {
        None
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
