//! Error types for view resolution.
//!
//! Everything except [`ViewError::FetchFailure`] is caused by the request
//! directives and should surface as a client error at the transport boundary.
//! Every variant carries the offending field name or path.

use thiserror::Error;

/// Boxed error returned by a relation fetcher.
pub type FetchError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while resolving a view.
#[derive(Error, Debug)]
pub enum ViewError {
    /// A field named in the field selection does not exist on the entity.
    #[error("unknown field '{field}'")]
    UnknownField {
        /// Full path of the offending field, e.g. `besluittypen.foo`.
        field: String,
    },

    /// An expansion path names a relation the entity does not declare.
    #[error("unknown relation '{relation}'")]
    UnknownRelation {
        /// Full path of the offending relation.
        relation: String,
    },

    /// The relation exists but is not declared expandable.
    #[error("relation '{relation}' cannot be expanded")]
    NotExpandable {
        /// Full path of the offending relation.
        relation: String,
    },

    /// An expansion path continues through a plain field.
    #[error("expansion path '{path}' goes through field '{field}', which is not a relation")]
    AmbiguousPath {
        /// The full expansion path as given.
        path: String,
        /// The non-relational field the path runs into.
        field: String,
    },

    /// An expansion path is empty or has an empty segment.
    #[error("invalid expansion path '{path}'")]
    InvalidPath {
        /// The path as given.
        path: String,
    },

    /// An expansion path is nested deeper than allowed.
    #[error("expansion path '{path}' exceeds the maximum depth of {max_depth}")]
    PathTooDeep {
        /// The offending path.
        path: String,
        /// The configured limit.
        max_depth: usize,
    },

    /// A relation fetcher failed; the underlying error is kept as the source.
    #[error("failed to fetch relation '{relation}': {source}")]
    FetchFailure {
        /// Full path of the relation being fetched.
        relation: String,
        /// The fetcher's error.
        #[source]
        source: FetchError,
    },
}

impl ViewError {
    /// Returns true when the error was caused by the request directives.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ViewError::FetchFailure { .. })
    }

    /// The field name or path the error refers to.
    pub fn subject(&self) -> &str {
        match self {
            ViewError::UnknownField { field } => field,
            ViewError::UnknownRelation { relation }
            | ViewError::NotExpandable { relation }
            | ViewError::FetchFailure { relation, .. } => relation,
            ViewError::AmbiguousPath { path, .. }
            | ViewError::InvalidPath { path }
            | ViewError::PathTooDeep { path, .. } => path,
        }
    }
}

/// Result type alias for view operations.
pub type ViewResult<T> = Result<T, ViewError>;
