//! List queries: filtering, sorting and free-text search.
//!
//! Queries run over the resources produced by the graph provider, before view
//! resolution, so they see the canonical scalar values a client would see.
//!
//! | Part     | Parameter      | Semantics                                         |
//! |----------|----------------|---------------------------------------------------|
//! | filters  | `<field>=<v>`  | exact match, all filters must hold                |
//! | sort     | `sorteer`      | comma-separated fields, `-` prefix for descending |
//! | search   | `zoek`         | whitespace terms, each a case-insensitive substring of some searchable field |

use std::cmp::Ordering;

use thiserror::Error;
use ztc_view::{FieldValue, Resource, Scalar};

use crate::kind::ResourceKind;

/// Errors for list queries the resource kind cannot answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The filter name is not a filterable field of the kind.
    #[error("unknown filter '{name}' for {resource}")]
    UnknownFilter {
        /// Singular resource name.
        resource: &'static str,
        /// The filter as requested.
        name: String,
    },

    /// The sort field is not a scalar field of the kind.
    #[error("cannot sort {resource} by '{field}'")]
    UnknownSortField {
        /// Singular resource name.
        resource: &'static str,
        /// The sort field as requested.
        field: String,
    },

    /// A sort key is empty, e.g. `sorteer=-` or `sorteer=a,,b`.
    #[error("empty sort field")]
    EmptySortField,
}

impl QueryError {
    /// The offending parameter name.
    pub fn subject(&self) -> &str {
        match self {
            QueryError::UnknownFilter { name, .. } => name,
            QueryError::UnknownSortField { field, .. } => field,
            QueryError::EmptySortField => "",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field to sort by.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

impl SortKey {
    /// Parses `field` or `-field`.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let raw = raw.trim();
        let (field, direction) = match raw.strip_prefix('-') {
            Some(field) => (field, SortDirection::Descending),
            None => (raw, SortDirection::Ascending),
        };
        if field.is_empty() {
            return Err(QueryError::EmptySortField);
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Filters, sort keys and search terms for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Exact-match filters, `(field, value)`.
    pub filters: Vec<(String, String)>,
    /// Sort keys, most significant first.
    pub sort: Vec<SortKey>,
    /// Lowercased search terms.
    pub search: Vec<String>,
}

impl CatalogQuery {
    /// An empty query: everything, in id order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact-match filter.
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Adds a sort key.
    pub fn with_sort(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    /// Parses a comma-separated sort parameter.
    pub fn with_sort_param(mut self, raw: &str) -> Result<Self, QueryError> {
        for part in raw.split(',') {
            self.sort.push(SortKey::parse(part)?);
        }
        Ok(self)
    }

    /// Splits a search parameter into terms.
    pub fn with_search(mut self, text: &str) -> Self {
        self.search
            .extend(text.split_whitespace().map(str::to_lowercase));
        self
    }

    /// Returns true when the query neither filters nor reorders.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.sort.is_empty() && self.search.is_empty()
    }

    /// Checks the query against the kind's filterable and sortable fields.
    pub fn validate(&self, kind: ResourceKind) -> Result<(), QueryError> {
        for (name, _) in &self.filters {
            if !kind.filterable_fields().contains(&name.as_str()) {
                return Err(QueryError::UnknownFilter {
                    resource: kind.name(),
                    name: name.clone(),
                });
            }
        }
        for key in &self.sort {
            if !kind.is_sortable(&key.field) {
                return Err(QueryError::UnknownSortField {
                    resource: kind.name(),
                    field: key.field.clone(),
                });
            }
        }
        Ok(())
    }

    /// Filters, searches and sorts resources of one kind.
    ///
    /// The input order is kept for equal sort keys.
    pub fn apply(&self, kind: ResourceKind, resources: Vec<Resource>) -> Result<Vec<Resource>, QueryError> {
        self.validate(kind)?;

        let mut matching: Vec<Resource> = resources
            .into_iter()
            .filter(|resource| self.matches_filters(resource) && self.matches_search(kind, resource))
            .collect();

        if !self.sort.is_empty() {
            matching.sort_by(|a, b| self.compare(a, b));
        }
        Ok(matching)
    }

    fn matches_filters(&self, resource: &Resource) -> bool {
        self.filters.iter().all(|(field, expected)| match resource.node.get(field) {
            Some(FieldValue::Scalar(scalar)) => !scalar.is_null() && scalar.to_query_text() == *expected,
            Some(FieldValue::List(items)) => items.iter().any(|s| s.to_query_text() == *expected),
            _ => false,
        })
    }

    fn matches_search(&self, kind: ResourceKind, resource: &Resource) -> bool {
        self.search.iter().all(|term| {
            kind.searchable_fields().iter().any(|field| {
                resource
                    .node
                    .get(field)
                    .and_then(FieldValue::as_scalar)
                    .and_then(Scalar::as_str)
                    .is_some_and(|text| text.to_lowercase().contains(term.as_str()))
            })
        })
    }

    fn compare(&self, a: &Resource, b: &Resource) -> Ordering {
        for key in &self.sort {
            let ordering = compare_scalars(sort_value(a, &key.field), sort_value(b, &key.field));
            let ordering = match key.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

fn sort_value<'a>(resource: &'a Resource, field: &str) -> Option<&'a Scalar> {
    resource.node.get(field).and_then(FieldValue::as_scalar)
}

fn rank(scalar: Option<&Scalar>) -> u8 {
    match scalar {
        None | Some(Scalar::Null) => 0,
        Some(Scalar::Bool(_)) => 1,
        Some(Scalar::Number(_)) => 2,
        Some(Scalar::Text(_)) => 3,
    }
}

/// Orders scalars with nulls first; values of different types order by type.
fn compare_scalars(a: Option<&Scalar>, b: Option<&Scalar>) -> Ordering {
    match (a, b) {
        (Some(Scalar::Bool(x)), Some(Scalar::Bool(y))) => x.cmp(y),
        (Some(Scalar::Number(x)), Some(Scalar::Number(y))) => {
            match (x.as_u64(), y.as_u64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
        }
        (Some(Scalar::Text(x)), Some(Scalar::Text(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
