//! Seed data loading.
//!
//! A seed file is a JSON object with one array per table:
//!
//! ```json
//! {
//!   "catalogussen": [{"id": 1, "domein": "ABCDE", "rsin": "123456789", "contactpersoon_beheer_naam": "Jan"}],
//!   "informatieobjecttypen": [],
//!   "besluittypen": [],
//!   "specificaties": [],
//!   "referenties": [],
//!   "eigenschappen": []
//! }
//! ```
//!
//! Rows go through the same validation as any other insert.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{
    BesluitType, Catalogus, Eigenschap, EigenschapReferentie, EigenschapSpecificatie,
    InformatieObjectType,
};
use crate::store::CatalogStore;

/// The contents of a seed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSeed {
    /// Catalogs.
    pub catalogussen: Vec<Catalogus>,
    /// Information object types; their catalogs must be seeded.
    pub informatieobjecttypen: Vec<InformatieObjectType>,
    /// Decision types; their catalogs and information object types must be seeded.
    pub besluittypen: Vec<BesluitType>,
    /// Property value specifications.
    pub specificaties: Vec<EigenschapSpecificatie>,
    /// Property references.
    pub referenties: Vec<EigenschapReferentie>,
    /// Properties.
    pub eigenschappen: Vec<Eigenschap>,
}

impl CatalogSeed {
    /// Reads and parses a seed file.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::SeedIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CatalogError::SeedFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Total number of rows.
    pub fn len(&self) -> usize {
        self.catalogussen.len()
            + self.informatieobjecttypen.len()
            + self.besluittypen.len()
            + self.specificaties.len()
            + self.referenties.len()
            + self.eigenschappen.len()
    }

    /// Returns true when the seed has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts all rows, referenced tables first. Stops at the first invalid row.
    pub fn load_into(self, store: &CatalogStore) -> CatalogResult<()> {
        let rows = self.len();
        for row in self.catalogussen {
            store.insert_catalogus(row)?;
        }
        for row in self.informatieobjecttypen {
            store.insert_informatieobjecttype(row)?;
        }
        for row in self.besluittypen {
            store.insert_besluittype(row)?;
        }
        for row in self.specificaties {
            store.insert_specificatie(row)?;
        }
        for row in self.referenties {
            store.insert_referentie(row)?;
        }
        for row in self.eigenschappen {
            store.insert_eigenschap(row)?;
        }
        info!(rows, catalogussen = store.catalogus_count(), "Loaded catalog seed");
        Ok(())
    }

    /// Builds a new store from the seed.
    pub fn into_store(self) -> CatalogResult<CatalogStore> {
        let store = CatalogStore::new();
        self.load_into(&store)?;
        Ok(store)
    }
}
