//! Scoped linked-target views and the relationship endpoints that drive the
//! Set Reconciler.
//!
//! Each endpoint pair exists once per target subtype; the handlers here are
//! thin wrappers that pin the subtype and delegate to one implementation.

use super::AppState;
use crate::auth::{AuthContext, ScopeConfig};
use crate::document::{
    expect_type, paginate, parse_document, relationship_type, Document, IdentifierListDocument,
    ListQuery, NodeResource, ResourceIdentifier,
};
use crate::error::ApiFailure;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use collections_core::{NodeId, ReconcileMode, RelationshipsApi, TargetKind};
use uuid::Uuid;

/// GET linked_nodes / linked_registrations: full target representations.
async fn linked_list(
    state: AppState,
    scopes: ScopeConfig,
    headers: HeaderMap,
    id: Uuid,
    query: ListQuery,
    kind: TargetKind,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_read(&scopes)?;

    let targets = state
        .service
        .read()
        .linked_targets(&ctx.principal, id, kind)?;
    let (page, meta) = paginate(
        targets,
        &query,
        state.config.page_size,
        state.config.max_page_size,
    );
    let resources: Vec<NodeResource> = page.iter().map(NodeResource::from).collect();
    Ok(Json(Document::paged(resources, meta)).into_response())
}

/// GET relationships/...: bare resource identifiers of the current set.
async fn relationship_get(
    state: AppState,
    scopes: ScopeConfig,
    headers: HeaderMap,
    id: Uuid,
    kind: TargetKind,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_read(&scopes)?;

    let targets = state
        .service
        .read()
        .linked_targets(&ctx.principal, id, kind)?;
    Ok(Json(Document::new(identifiers(
        targets.iter().map(|n| n.id),
        kind,
    )))
    .into_response())
}

/// POST/PUT/PATCH/DELETE relationships/...: reconcile and respond with the
/// post-mutation set.
async fn relationship_write(
    state: AppState,
    scopes: ScopeConfig,
    headers: HeaderMap,
    id: Uuid,
    body: serde_json::Value,
    kind: TargetKind,
    mode: ReconcileMode,
    success: StatusCode,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_write(&scopes)?;

    let doc: IdentifierListDocument = parse_document(body)?;
    let expected = relationship_type(kind);
    let mut requested: Vec<NodeId> = Vec::with_capacity(doc.data.len());
    for identifier in &doc.data {
        expect_type(&identifier.kind, expected)?;
        requested.push(identifier.id);
    }

    let current = state
        .service
        .write()
        .reconcile_links(&ctx.principal, id, kind, &requested, mode)?;

    if success == StatusCode::NO_CONTENT {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok((
        success,
        Json(Document::new(identifiers(current.into_iter(), kind))),
    )
        .into_response())
}

fn identifiers(
    ids: impl Iterator<Item = NodeId>,
    kind: TargetKind,
) -> Vec<ResourceIdentifier> {
    ids.map(|id| ResourceIdentifier {
        kind: relationship_type(kind).to_string(),
        id,
    })
    .collect()
}

// --------------------------------------------------------------------------
// linked_nodes
// --------------------------------------------------------------------------

pub async fn linked_nodes_list(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiFailure> {
    linked_list(state, scopes, headers, id, query, TargetKind::Project).await
}

pub async fn nodes_get(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiFailure> {
    relationship_get(state, scopes, headers, id, TargetKind::Project).await
}

pub async fn nodes_post(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    relationship_write(
        state,
        scopes,
        headers,
        id,
        body,
        TargetKind::Project,
        ReconcileMode::CreateOnly,
        StatusCode::CREATED,
    )
    .await
}

pub async fn nodes_put(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    relationship_write(
        state,
        scopes,
        headers,
        id,
        body,
        TargetKind::Project,
        ReconcileMode::Replace,
        StatusCode::OK,
    )
    .await
}

pub async fn nodes_delete(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    relationship_write(
        state,
        scopes,
        headers,
        id,
        body,
        TargetKind::Project,
        ReconcileMode::Remove,
        StatusCode::NO_CONTENT,
    )
    .await
}

// --------------------------------------------------------------------------
// linked_registrations
// --------------------------------------------------------------------------

pub async fn linked_registrations_list(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiFailure> {
    linked_list(state, scopes, headers, id, query, TargetKind::Registration).await
}

pub async fn registrations_get(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiFailure> {
    relationship_get(state, scopes, headers, id, TargetKind::Registration).await
}

pub async fn registrations_post(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    relationship_write(
        state,
        scopes,
        headers,
        id,
        body,
        TargetKind::Registration,
        ReconcileMode::CreateOnly,
        StatusCode::CREATED,
    )
    .await
}

pub async fn registrations_put(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    relationship_write(
        state,
        scopes,
        headers,
        id,
        body,
        TargetKind::Registration,
        ReconcileMode::Replace,
        StatusCode::OK,
    )
    .await
}

pub async fn registrations_delete(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    relationship_write(
        state,
        scopes,
        headers,
        id,
        body,
        TargetKind::Registration,
        ReconcileMode::Remove,
        StatusCode::NO_CONTENT,
    )
    .await
}
