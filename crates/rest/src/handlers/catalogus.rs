//! Catalog handlers.
//!
//! `GET [base]/catalogussen` and `GET [base]/catalogussen/{catalogus_pk}`

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::debug;
use ztc_catalog::ResourceKind;

use crate::error::RestResult;
use crate::extractors::ResourceQuery;
use crate::handlers::parse_pk;
use crate::responses::CollectionResponse;
use crate::state::AppState;

/// Handler for the catalog list.
///
/// # HTTP Request
///
/// `GET [base]/catalogussen?rsin=...&domein=...&sorteer=...&zoek=...&expand=...&fields=...`
///
/// # Response
///
/// - `200 OK` - `{"results": [...]}`
/// - `400 Bad Request` - Unknown filter, sort field, field or relation
pub async fn list_catalogussen_handler(
    State(state): State<AppState>,
    query: ResourceQuery,
) -> RestResult<Response> {
    debug!(
        filters = query.catalog_query().filters.len(),
        expand_all = query.expansion().is_all(),
        "Processing catalogus list request"
    );

    let schema = ResourceKind::Catalogus.schema();
    state.resolver().check(schema, query.expansion(), query.fields())?;
    let resources = state.graph().catalogussen(query.catalog_query())?;
    let results = state
        .resolver()
        .resolve_all(resources, query.expansion(), query.fields())
        .await?;

    Ok(CollectionResponse::new(results).into_response())
}

/// Handler for a single catalog.
///
/// # HTTP Request
///
/// `GET [base]/catalogussen/{catalogus_pk}?expand=...&fields=...`
///
/// # Response
///
/// - `200 OK` - The catalog, without envelope
/// - `400 Bad Request` - Unknown field or relation
/// - `404 Not Found` - No such catalog
pub async fn read_catalogus_handler(
    State(state): State<AppState>,
    Path(catalogus_pk): Path<String>,
    query: ResourceQuery,
) -> RestResult<Response> {
    debug!(catalogus = %catalogus_pk, "Processing catalogus read request");

    let schema = ResourceKind::Catalogus.schema();
    state.resolver().check(schema, query.expansion(), query.fields())?;
    let id = parse_pk("catalogus", &catalogus_pk)?;
    let resource = state.graph().catalogus(id)?;
    let view = state
        .resolver()
        .resolve_resource(resource, query.expansion(), query.fields())
        .await?;

    Ok(Json(view).into_response())
}
