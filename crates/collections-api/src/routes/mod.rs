//! Router assembly and shared application state.

mod collections;
mod node_links;
mod relationships;

use crate::auth::{scopes, ScopeConfig, TokenRegistry};
use crate::config::ApiConfig;
use axum::routing::get;
use axum::{Extension, Router};
use collections_core::adapters::{
    ContributorGate, InMemoryCollectionStore, InMemoryLinkStore, InMemoryNodeStore,
    SystemTimeSource,
};
use collections_core::CollectionService;
use parking_lot::RwLock;
use std::sync::Arc;

/// The concrete service wired with the in-memory adapters.
pub type CoreService = CollectionService<
    InMemoryCollectionStore,
    InMemoryNodeStore,
    InMemoryLinkStore,
    ContributorGate,
    SystemTimeSource,
>;

/// One lock around the authoritative store: reconciliation reads its current
/// set and applies its diff under the same write guard, so concurrent
/// requests against a collection serialize.
pub type SharedService = Arc<RwLock<CoreService>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: SharedService,
    pub tokens: Arc<TokenRegistry>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(service: CoreService, tokens: TokenRegistry, config: ApiConfig) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }
}

/// Scopes for the collection resource endpoints.
const COLLECTION_SCOPES: ScopeConfig = ScopeConfig {
    read_scopes: &[scopes::COLLECTIONS_READ],
    write_scopes: &[scopes::COLLECTIONS_WRITE],
};

/// Scopes for everything that manipulates link edges.
const LINK_SCOPES: ScopeConfig = ScopeConfig {
    read_scopes: &[scopes::NODE_LINKS_READ],
    write_scopes: &[scopes::NODE_LINKS_WRITE],
};

/// Build the full route table.
///
/// Scope requirements are attached per endpoint group here, at registration
/// time, rather than read from any global table.
pub fn build_router(state: AppState) -> Router {
    let collection_routes = Router::new()
        .route(
            "/v1/collections/",
            get(collections::list)
                .post(collections::create)
                .put(collections::bulk_update)
                .patch(collections::bulk_update)
                .delete(collections::bulk_delete),
        )
        .route(
            "/v1/collections/:id/",
            get(collections::detail)
                .put(collections::update)
                .patch(collections::update)
                .delete(collections::delete),
        )
        .route_layer(Extension(COLLECTION_SCOPES));

    let link_routes = Router::new()
        .route(
            "/v1/collections/:id/linked_nodes/",
            get(relationships::linked_nodes_list),
        )
        .route(
            "/v1/collections/:id/linked_registrations/",
            get(relationships::linked_registrations_list),
        )
        .route(
            "/v1/collections/:id/relationships/linked_nodes/",
            get(relationships::nodes_get)
                .post(relationships::nodes_post)
                .put(relationships::nodes_put)
                .patch(relationships::nodes_put)
                .delete(relationships::nodes_delete),
        )
        .route(
            "/v1/collections/:id/relationships/linked_registrations/",
            get(relationships::registrations_get)
                .post(relationships::registrations_post)
                .put(relationships::registrations_put)
                .patch(relationships::registrations_put)
                .delete(relationships::registrations_delete),
        )
        .route(
            "/v1/collections/:id/node_links/",
            get(node_links::list)
                .post(node_links::create)
                .delete(node_links::bulk_delete),
        )
        .route(
            "/v1/collections/:id/node_links/:link_id/",
            get(node_links::detail).delete(node_links::delete),
        )
        .route_layer(Extension(LINK_SCOPES));

    Router::new()
        .merge(collection_routes)
        .merge(link_routes)
        .with_state(state)
}
