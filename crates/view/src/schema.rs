//! Static resource shapes.
//!
//! A [`ResourceSchema`] states which fields and relations every resource of a
//! kind carries, independent of fetched data. The resolver checks directives
//! against it before fetching, so a misspelled field below an empty or absent
//! relation is still rejected.

use std::fmt;

/// The shape of one resource kind.
pub trait ResourceSchema: fmt::Debug + Send + Sync {
    /// Returns true if `name` is a field of this kind, relations included.
    fn has_field(&self, name: &str) -> bool;

    /// Looks up a relation by name.
    fn relation_schema(&self, name: &str) -> Option<SchemaRelation>;
}

/// A relation as seen by a [`ResourceSchema`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaRelation {
    /// Whether clients may expand it.
    pub expandable: bool,
    /// Shape of the related resource(s).
    pub target: &'static dyn ResourceSchema,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Catalog and decision type shapes used by resolver tests.
    #[derive(Debug)]
    pub(crate) enum TestSchema {
        Catalogus,
        BesluitType,
    }

    impl ResourceSchema for TestSchema {
        fn has_field(&self, name: &str) -> bool {
            let fields: &[&str] = match self {
                TestSchema::Catalogus => &[
                    "url",
                    "domein",
                    "rsin",
                    "contactpersoon_beheer_naam",
                    "besluittypen",
                    "informatieobjecttypen",
                    "eigenschappen",
                ],
                TestSchema::BesluitType => {
                    &["id", "besluittype_omschrijving", "toelichting", "maakt_deel_uit_van"]
                }
            };
            fields.contains(&name)
        }

        fn relation_schema(&self, name: &str) -> Option<SchemaRelation> {
            match (self, name) {
                (TestSchema::Catalogus, "besluittypen") => Some(SchemaRelation {
                    expandable: true,
                    target: &TestSchema::BesluitType,
                }),
                (TestSchema::BesluitType, "maakt_deel_uit_van") => Some(SchemaRelation {
                    expandable: true,
                    target: &TestSchema::Catalogus,
                }),
                _ => None,
            }
        }
    }
}
