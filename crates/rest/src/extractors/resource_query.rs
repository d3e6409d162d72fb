//! Query parameter extractor.
//!
//! Splits the query string of a request into the view directives (`expand`,
//! `fields`) and the list query (`sorteer`, `zoek`, filters). Parameter names
//! come from [`ServerConfig`]; every parameter that is not one of the four
//! reserved names is treated as a filter.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use tracing::warn;
use ztc_catalog::CatalogQuery;
use ztc_view::{ExpansionSpec, FieldSpec};

use crate::config::ServerConfig;
use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Axum extractor for view directives and list queries.
///
/// # Example
///
/// ```rust,ignore
/// use ztc_rest::extractors::ResourceQuery;
///
/// async fn handler(query: ResourceQuery) {
///     println!("expand all: {}", query.expansion().is_all());
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct ResourceQuery {
    /// Relations to embed.
    expansion: ExpansionSpec,

    /// Top-level fields to keep.
    fields: FieldSpec,

    /// Filters, sort keys and search terms.
    query: CatalogQuery,
}

impl ResourceQuery {
    /// Creates an empty query: no expansion, all fields, no filtering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses query parameters in request order.
    ///
    /// Repeated filters are all applied; for the reserved parameters the last
    /// occurrence wins.
    pub fn from_pairs(pairs: Vec<(String, String)>, config: &ServerConfig) -> RestResult<Self> {
        let mut result = Self::default();

        for (name, value) in pairs {
            if name == config.expand_param {
                result.expansion = parse_expansion(&value, config)?;
            } else if name == config.fields_param {
                result.fields = FieldSpec::only(split_list(&value));
            } else if name == config.sort_param {
                result.query.sort.clear();
                if !value.trim().is_empty() {
                    result.query = result.query.with_sort_param(&value).map_err(|err| {
                        RestError::invalid_param(&config.sort_param, "invalid-sort", err.to_string())
                    })?;
                }
            } else if name == config.search_param {
                result.query.search.clear();
                result.query = result.query.with_search(&value);
            } else {
                result.query = result.query.with_filter(name, value);
            }
        }

        Ok(result)
    }

    /// Returns the expansion directive.
    pub fn expansion(&self) -> &ExpansionSpec {
        &self.expansion
    }

    /// Returns the field selection.
    pub fn fields(&self) -> &FieldSpec {
        &self.fields
    }

    /// Returns the list query.
    pub fn catalog_query(&self) -> &CatalogQuery {
        &self.query
    }
}

/// Splits a comma-separated list, skipping blank items.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn parse_expansion(raw: &str, config: &ServerConfig) -> RestResult<ExpansionSpec> {
    let raw = raw.trim();
    if raw == config.expand_all_value {
        return Ok(ExpansionSpec::All);
    }
    ExpansionSpec::parse_paths(split_list(raw)).map_err(|err| {
        warn!(param = %config.expand_param, value = %raw, error = %err, "Rejected expansion");
        RestError::from(err)
    })
}

impl FromRequestParts<AppState> for ResourceQuery {
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|err| RestError::BadRequest {
                message: format!("Invalid query string: {}", err),
                invalid_params: Vec::new(),
            })?;

        ResourceQuery::from_pairs(pairs, state.config())
    }
}
