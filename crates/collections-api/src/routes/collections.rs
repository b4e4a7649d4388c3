//! Collection list, detail, and bulk endpoints.

use super::AppState;
use crate::auth::{AuthContext, ScopeConfig};
use crate::document::{
    expect_type, paginate, parse_document, types, BulkDocument, CollectionResource,
    CreateDocument, Document, ListQuery, UpdateDocument,
};
use crate::error::ApiFailure;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use collections_core::{
    CollectionError, CollectionPatch, CollectionsApi, ListFilter,
};
use uuid::Uuid;

/// GET /v1/collections/
pub async fn list(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_read(&scopes)?;

    let filter = ListFilter {
        title_contains: query.filter_title.clone(),
    };
    let collections = state.service.read().list_collections(&ctx.principal, &filter);

    let (page, meta) = paginate(
        collections,
        &query,
        state.config.page_size,
        state.config.max_page_size,
    );
    let resources: Vec<CollectionResource> = page.iter().map(CollectionResource::from).collect();
    Ok(Json(Document::paged(resources, meta)).into_response())
}

/// POST /v1/collections/
pub async fn create(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_write(&scopes)?;

    let doc: CreateDocument = parse_document(body)?;
    expect_type(&doc.data.kind, types::COLLECTIONS)?;

    let collection = state.service.write().create_collection(
        &ctx.principal,
        &doc.data.attributes.title,
        doc.data.attributes.public,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(Document::new(CollectionResource::from(&collection))),
    )
        .into_response())
}

/// PUT/PATCH /v1/collections/
pub async fn bulk_update(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_write(&scopes)?;

    let doc: BulkDocument = parse_document(body)?;
    let mut patches = Vec::with_capacity(doc.data.len());
    for resource in doc.data {
        expect_type(&resource.kind, types::COLLECTIONS)?;
        let id = resource.id.ok_or_else(|| {
            ApiFailure::from(CollectionError::invalid(
                "bulk update requires an id on every resource",
            ))
        })?;
        patches.push((
            id,
            CollectionPatch {
                title: resource.attributes.title,
                is_public: resource.attributes.public,
            },
        ));
    }

    let updated = state
        .service
        .write()
        .bulk_update_collections(&ctx.principal, patches)?;
    let resources: Vec<CollectionResource> = updated.iter().map(CollectionResource::from).collect();
    Ok(Json(Document::new(resources)).into_response())
}

/// DELETE /v1/collections/
pub async fn bulk_delete(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_write(&scopes)?;

    let doc: BulkDocument = parse_document(body)?;
    let mut ids = Vec::with_capacity(doc.data.len());
    for resource in doc.data {
        expect_type(&resource.kind, types::COLLECTIONS)?;
        ids.push(resource.id.ok_or_else(|| {
            ApiFailure::from(CollectionError::invalid(
                "bulk delete requires an id on every resource",
            ))
        })?);
    }

    state
        .service
        .write()
        .bulk_delete_collections(&ctx.principal, ids)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /v1/collections/{id}/
pub async fn detail(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_read(&scopes)?;

    let collection = state.service.read().get_collection(&ctx.principal, id)?;
    Ok(Json(Document::new(CollectionResource::from(&collection))).into_response())
}

/// PUT/PATCH /v1/collections/{id}/
pub async fn update(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_write(&scopes)?;

    let doc: UpdateDocument = parse_document(body)?;
    expect_type(&doc.data.kind, types::COLLECTIONS)?;
    if let Some(body_id) = doc.data.id {
        if body_id != id {
            return Err(ApiFailure::from(CollectionError::conflict(
                "resource id does not match the request path",
            )));
        }
    }

    let patch = CollectionPatch {
        title: doc.data.attributes.title,
        is_public: doc.data.attributes.public,
    };
    let updated = state
        .service
        .write()
        .update_collection(&ctx.principal, id, patch)?;
    Ok(Json(Document::new(CollectionResource::from(&updated))).into_response())
}

/// DELETE /v1/collections/{id}/
pub async fn delete(
    State(state): State<AppState>,
    Extension(scopes): Extension<ScopeConfig>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiFailure> {
    let ctx = AuthContext::from_headers(&headers, &state.tokens)?;
    ctx.require_write(&scopes)?;

    state.service.write().delete_collection(&ctx.principal, id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
