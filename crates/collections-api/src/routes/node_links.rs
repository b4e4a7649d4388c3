//! Legacy node-link endpoints.
//!
//! Deprecated in favor of the relationship endpoints; these manipulate the
//! same underlying edge records one at a time.

use super::AppState;
use crate::auth::{AuthContext, ScopeConfig};
use crate::document::{
    expect_type, paginate, parse_document, types, Document, IdentifierListDocument, ListQuery,
    NodeLinkCreateDocument, NodeLinkResource,
};
use crate::error::ApiFailure;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use collections_core::{CollectionError, RelationshipsApi};
use uuid::Uuid;

/// GET /v1/collections/{id}/node_links/
pub async fn list(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_read(&scopes)?;

    let links = state.service.read().node_links(&ctx.principal, id)?;
    let (page, meta) = paginate(
        links,
        &query,
        state.config.page_size,
        state.config.max_page_size,
    );
    let resources: Vec<NodeLinkResource> = page
        .iter()
        .map(|(link, node)| NodeLinkResource::new(link, node))
        .collect();
    Ok(Json(Document::paged(resources, meta)).into_response())
}

/// POST /v1/collections/{id}/node_links/
pub async fn create(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_write(&scopes)?;

    let doc: NodeLinkCreateDocument = parse_document(body)?;
    expect_type(&doc.data.kind, types::NODE_LINKS)?;
    let target = doc.data.relationships.target_node.data;
    if target.kind != types::NODES && target.kind != types::REGISTRATIONS {
        return Err(ApiFailure::from(CollectionError::conflict(format!(
            "target_node type {:?} is not a linkable resource",
            target.kind
        ))));
    }

    let link = {
        let mut service = state.service.write();
        let link = service.create_node_link(&ctx.principal, id, target.id)?;
        let (link, node) = service.get_node_link(&ctx.principal, id, link.id)?;
        NodeLinkResource::new(&link, &node)
    };
    Ok((StatusCode::CREATED, Json(Document::new(link))).into_response())
}

/// DELETE /v1/collections/{id}/node_links/
pub async fn bulk_delete(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_write(&scopes)?;

    let doc: IdentifierListDocument = parse_document(body)?;
    let mut ids = Vec::with_capacity(doc.data.len());
    for identifier in &doc.data {
        expect_type(&identifier.kind, types::NODE_LINKS)?;
        ids.push(identifier.id);
    }

    state
        .service
        .write()
        .bulk_delete_node_links(&ctx.principal, id, ids)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /v1/collections/{id}/node_links/{link_id}/
pub async fn detail(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path((id, link_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_read(&scopes)?;

    let (link, node) = state
        .service
        .read()
        .get_node_link(&ctx.principal, id, link_id)?;
    Ok(Json(Document::new(NodeLinkResource::new(&link, &node))).into_response())
}

/// DELETE /v1/collections/{id}/node_links/{link_id}/
pub async fn delete(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path((id, link_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_write(&scopes)?;

    state
        .service
        .write()
        .delete_node_link(&ctx.principal, id, link_id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
