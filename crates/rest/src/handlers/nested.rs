//! Handlers for collections nested under a catalog.
//!
//! `GET [base]/catalogussen/{catalogus_pk}/{collection}` and
//! `GET [base]/catalogussen/{catalogus_pk}/{collection}/{pk}` for the
//! `besluittypen`, `informatieobjecttypen` and `eigenschappen` collections.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::debug;
use ztc_catalog::ResourceKind;

use crate::error::{RestError, RestResult};
use crate::extractors::ResourceQuery;
use crate::handlers::parse_pk;
use crate::responses::CollectionResponse;
use crate::state::AppState;

fn nested_kind(collection: &str) -> RestResult<ResourceKind> {
    ResourceKind::from_collection(collection)
        .filter(|kind| ResourceKind::NESTED.contains(kind))
        .ok_or_else(|| RestError::NotFound {
            resource: "collection".to_string(),
            id: collection.to_string(),
        })
}

/// Handler for a nested collection.
///
/// # HTTP Request
///
/// `GET [base]/catalogussen/{catalogus_pk}/{collection}`
///
/// # Response
///
/// - `200 OK` - `{"results": [...]}`
/// - `400 Bad Request` - Unknown filter, sort field, field or relation
/// - `404 Not Found` - No such catalog or collection
pub async fn list_nested_handler(
    State(state): State<AppState>,
    Path((catalogus_pk, collection)): Path<(String, String)>,
    query: ResourceQuery,
) -> RestResult<Response> {
    debug!(
        catalogus = %catalogus_pk,
        collection = %collection,
        "Processing nested list request"
    );

    let kind = nested_kind(&collection)?;
    state.resolver().check(kind.schema(), query.expansion(), query.fields())?;
    let catalogus = parse_pk("catalogus", &catalogus_pk)?;
    let resources = state
        .graph()
        .collection(catalogus, kind, query.catalog_query())?;
    let results = state
        .resolver()
        .resolve_all(resources, query.expansion(), query.fields())
        .await?;

    Ok(CollectionResponse::new(results).into_response())
}

/// Handler for a member of a nested collection.
///
/// # HTTP Request
///
/// `GET [base]/catalogussen/{catalogus_pk}/{collection}/{pk}`
///
/// # Response
///
/// - `200 OK` - The resource, without envelope
/// - `400 Bad Request` - Unknown field or relation
/// - `404 Not Found` - No such catalog, collection or member of this catalog
pub async fn read_nested_handler(
    State(state): State<AppState>,
    Path((catalogus_pk, collection, pk)): Path<(String, String, String)>,
    query: ResourceQuery,
) -> RestResult<Response> {
    debug!(
        catalogus = %catalogus_pk,
        collection = %collection,
        id = %pk,
        "Processing nested read request"
    );

    let kind = nested_kind(&collection)?;
    state.resolver().check(kind.schema(), query.expansion(), query.fields())?;
    let catalogus = parse_pk("catalogus", &catalogus_pk)?;
    let id = parse_pk(kind.name(), &pk)?;
    let resource = state.graph().member(catalogus, kind, id)?;
    let view = state
        .resolver()
        .resolve_resource(resource, query.expansion(), query.fields())
        .await?;

    Ok(Json(view).into_response())
}
