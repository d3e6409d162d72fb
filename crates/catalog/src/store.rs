//! In-memory catalog store.
//!
//! Rows are kept in ordered maps keyed by id, so every listing comes out in
//! id order. Inserts run the row's [`Validate`] rules and then the rules that
//! need the rest of the store: referential integrity and the uniqueness of a
//! decision type's description within its catalog.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{
    BesluitType, Catalogus, Eigenschap, EigenschapReferentie, EigenschapSpecificatie,
    InformatieObjectType,
};
use crate::validation::{Validate, ValidationError};

const CATALOGUS: &str = "catalogus";
const BESLUITTYPE: &str = "besluittype";
const INFORMATIEOBJECTTYPE: &str = "informatieobjecttype";
const EIGENSCHAP: &str = "eigenschap";
const SPECIFICATIE: &str = "eigenschapspecificatie";
const REFERENTIE: &str = "eigenschapreferentie";

#[derive(Debug, Default)]
struct Tables {
    catalogussen: BTreeMap<u64, Catalogus>,
    besluittypen: BTreeMap<u64, BesluitType>,
    informatieobjecttypen: BTreeMap<u64, InformatieObjectType>,
    eigenschappen: BTreeMap<u64, Eigenschap>,
    specificaties: BTreeMap<u64, EigenschapSpecificatie>,
    referenties: BTreeMap<u64, EigenschapReferentie>,
}

/// Thread-safe in-memory store for catalog rows.
#[derive(Debug, Default)]
pub struct CatalogStore {
    tables: RwLock<Tables>,
}

fn validated<T: Validate>(resource: &'static str, id: u64, row: &T) -> CatalogResult<()> {
    let errors = row.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation {
            resource,
            id,
            errors,
        })
    }
}

fn ensure_new<T>(table: &BTreeMap<u64, T>, resource: &'static str, id: u64) -> CatalogResult<()> {
    if table.contains_key(&id) {
        Err(CatalogError::Duplicate { resource, id })
    } else {
        Ok(())
    }
}

fn ensure_exists<T>(
    table: &BTreeMap<u64, T>,
    resource: &'static str,
    id: u64,
    target: &'static str,
    target_id: u64,
) -> CatalogResult<()> {
    if table.contains_key(&target_id) {
        Ok(())
    } else {
        Err(CatalogError::DanglingReference {
            resource,
            id,
            target,
            target_id,
        })
    }
}

impl CatalogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Inserts a catalog.
    pub fn insert_catalogus(&self, row: Catalogus) -> CatalogResult<()> {
        validated(CATALOGUS, row.id, &row)?;
        let mut tables = self.tables.write();
        ensure_new(&tables.catalogussen, CATALOGUS, row.id)?;
        debug!(id = row.id, domein = %row.domein, "Inserted catalogus");
        tables.catalogussen.insert(row.id, row);
        Ok(())
    }

    /// Inserts an information object type.
    pub fn insert_informatieobjecttype(&self, row: InformatieObjectType) -> CatalogResult<()> {
        validated(INFORMATIEOBJECTTYPE, row.id, &row)?;
        let mut tables = self.tables.write();
        ensure_new(&tables.informatieobjecttypen, INFORMATIEOBJECTTYPE, row.id)?;
        ensure_exists(
            &tables.catalogussen,
            INFORMATIEOBJECTTYPE,
            row.id,
            CATALOGUS,
            row.maakt_deel_uit_van,
        )?;
        debug!(id = row.id, catalogus = row.maakt_deel_uit_van, "Inserted informatieobjecttype");
        tables.informatieobjecttypen.insert(row.id, row);
        Ok(())
    }

    /// Inserts a decision type.
    ///
    /// The information object types it refers to must already exist, and the
    /// description must be unique within the catalog.
    pub fn insert_besluittype(&self, row: BesluitType) -> CatalogResult<()> {
        validated(BESLUITTYPE, row.id, &row)?;
        let mut tables = self.tables.write();
        ensure_new(&tables.besluittypen, BESLUITTYPE, row.id)?;
        ensure_exists(
            &tables.catalogussen,
            BESLUITTYPE,
            row.id,
            CATALOGUS,
            row.maakt_deel_uit_van,
        )?;
        for iot in &row.wordt_vastgelegd_in {
            ensure_exists(
                &tables.informatieobjecttypen,
                BESLUITTYPE,
                row.id,
                INFORMATIEOBJECTTYPE,
                *iot,
            )?;
        }

        if let Some(omschrijving) = &row.besluittype_omschrijving {
            let taken = tables.besluittypen.values().any(|other| {
                other.maakt_deel_uit_van == row.maakt_deel_uit_van
                    && other.besluittype_omschrijving.as_ref() == Some(omschrijving)
            });
            if taken {
                return Err(CatalogError::Validation {
                    resource: BESLUITTYPE,
                    id: row.id,
                    errors: vec![ValidationError::field(
                        "besluittype_omschrijving",
                        "Besluittype met deze omschrijving bestaat al in deze catalogus.",
                    )],
                });
            }
        }

        debug!(id = row.id, catalogus = row.maakt_deel_uit_van, "Inserted besluittype");
        tables.besluittypen.insert(row.id, row);
        Ok(())
    }

    /// Inserts a property value specification.
    pub fn insert_specificatie(&self, row: EigenschapSpecificatie) -> CatalogResult<()> {
        let mut tables = self.tables.write();
        ensure_new(&tables.specificaties, SPECIFICATIE, row.id)?;
        tables.specificaties.insert(row.id, row);
        Ok(())
    }

    /// Inserts a property reference.
    pub fn insert_referentie(&self, row: EigenschapReferentie) -> CatalogResult<()> {
        let mut tables = self.tables.write();
        ensure_new(&tables.referenties, REFERENTIE, row.id)?;
        tables.referenties.insert(row.id, row);
        Ok(())
    }

    /// Inserts a property. Its specification or reference must already exist.
    pub fn insert_eigenschap(&self, row: Eigenschap) -> CatalogResult<()> {
        validated(EIGENSCHAP, row.id, &row)?;
        let mut tables = self.tables.write();
        ensure_new(&tables.eigenschappen, EIGENSCHAP, row.id)?;
        ensure_exists(
            &tables.catalogussen,
            EIGENSCHAP,
            row.id,
            CATALOGUS,
            row.maakt_deel_uit_van,
        )?;
        if let Some(id) = row.specificatie_van_eigenschap {
            ensure_exists(&tables.specificaties, EIGENSCHAP, row.id, SPECIFICATIE, id)?;
        }
        if let Some(id) = row.referentie_naar_eigenschap {
            ensure_exists(&tables.referenties, EIGENSCHAP, row.id, REFERENTIE, id)?;
        }
        debug!(id = row.id, catalogus = row.maakt_deel_uit_van, "Inserted eigenschap");
        tables.eigenschappen.insert(row.id, row);
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Looks up a catalog.
    pub fn catalogus(&self, id: u64) -> CatalogResult<Catalogus> {
        self.tables
            .read()
            .catalogussen
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                resource: CATALOGUS,
                id,
            })
    }

    /// All catalogs in id order.
    pub fn catalogussen(&self) -> Vec<Catalogus> {
        self.tables.read().catalogussen.values().cloned().collect()
    }

    /// Looks up a decision type.
    pub fn besluittype(&self, id: u64) -> CatalogResult<BesluitType> {
        self.tables
            .read()
            .besluittypen
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                resource: BESLUITTYPE,
                id,
            })
    }

    /// Decision types of one catalog in id order.
    pub fn besluittypen_of(&self, catalogus: u64) -> Vec<BesluitType> {
        self.tables
            .read()
            .besluittypen
            .values()
            .filter(|row| row.maakt_deel_uit_van == catalogus)
            .cloned()
            .collect()
    }

    /// Decision types recorded in the given information object type.
    pub fn besluittypen_recorded_in(&self, informatieobjecttype: u64) -> Vec<BesluitType> {
        self.tables
            .read()
            .besluittypen
            .values()
            .filter(|row| row.wordt_vastgelegd_in.contains(&informatieobjecttype))
            .cloned()
            .collect()
    }

    /// Looks up an information object type.
    pub fn informatieobjecttype(&self, id: u64) -> CatalogResult<InformatieObjectType> {
        self.tables
            .read()
            .informatieobjecttypen
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                resource: INFORMATIEOBJECTTYPE,
                id,
            })
    }

    /// Information object types of one catalog in id order.
    pub fn informatieobjecttypen_of(&self, catalogus: u64) -> Vec<InformatieObjectType> {
        self.tables
            .read()
            .informatieobjecttypen
            .values()
            .filter(|row| row.maakt_deel_uit_van == catalogus)
            .cloned()
            .collect()
    }

    /// Information object types by id, in the order given.
    ///
    /// Fails on the first id that does not exist.
    pub fn informatieobjecttypen_by_ids(&self, ids: &[u64]) -> CatalogResult<Vec<InformatieObjectType>> {
        let tables = self.tables.read();
        ids.iter()
            .map(|id| {
                tables
                    .informatieobjecttypen
                    .get(id)
                    .cloned()
                    .ok_or(CatalogError::NotFound {
                        resource: INFORMATIEOBJECTTYPE,
                        id: *id,
                    })
            })
            .collect()
    }

    /// Looks up a property.
    pub fn eigenschap(&self, id: u64) -> CatalogResult<Eigenschap> {
        self.tables
            .read()
            .eigenschappen
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                resource: EIGENSCHAP,
                id,
            })
    }

    /// Properties of one catalog in id order.
    pub fn eigenschappen_of(&self, catalogus: u64) -> Vec<Eigenschap> {
        self.tables
            .read()
            .eigenschappen
            .values()
            .filter(|row| row.maakt_deel_uit_van == catalogus)
            .cloned()
            .collect()
    }

    /// Looks up a property value specification.
    pub fn specificatie(&self, id: u64) -> CatalogResult<EigenschapSpecificatie> {
        self.tables
            .read()
            .specificaties
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                resource: SPECIFICATIE,
                id,
            })
    }

    /// Looks up a property reference.
    pub fn referentie(&self, id: u64) -> CatalogResult<EigenschapReferentie> {
        self.tables
            .read()
            .referenties
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                resource: REFERENTIE,
                id,
            })
    }

    /// Number of catalogs.
    pub fn catalogus_count(&self) -> usize {
        self.tables.read().catalogussen.len()
    }
}
