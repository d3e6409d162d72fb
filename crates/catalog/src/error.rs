//! Error types for the catalog crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::query::QueryError;
use crate::validation::ValidationError;

/// Errors produced by the store, the graph provider and seed loading.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No row with the given id, or the row is not part of the requested catalog.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Singular resource name.
        resource: &'static str,
        /// The requested id.
        id: u64,
    },

    /// The path segment does not name a collection nested under a catalog.
    #[error("unknown collection '{collection}'")]
    UnknownCollection {
        /// The segment as requested.
        collection: String,
    },

    /// A row with the same id already exists.
    #[error("{resource} with id {id} already exists")]
    Duplicate {
        /// Singular resource name.
        resource: &'static str,
        /// The conflicting id.
        id: u64,
    },

    /// A row failed one or more validation rules.
    #[error("invalid {resource} {id}: {}", join(errors))]
    Validation {
        /// Singular resource name.
        resource: &'static str,
        /// Id of the rejected row.
        id: u64,
        /// All violated rules.
        errors: Vec<ValidationError>,
    },

    /// A row points at a row that does not exist.
    #[error("{resource} {id} refers to missing {target} {target_id}")]
    DanglingReference {
        /// Singular resource name of the referring row.
        resource: &'static str,
        /// Id of the referring row.
        id: u64,
        /// Singular resource name of the referenced row.
        target: &'static str,
        /// The missing id.
        target_id: u64,
    },

    /// The list query could not be applied.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The seed file could not be read.
    #[error("failed to read seed file {}: {source}", path.display())]
    SeedIo {
        /// Path of the seed file.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The seed file is not valid JSON for a catalog seed.
    #[error("invalid seed file {}: {source}", path.display())]
    SeedFormat {
        /// Path of the seed file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CatalogError {
    /// Returns true when the error means "no such resource".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::NotFound { .. } | CatalogError::UnknownCollection { .. }
        )
    }
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
