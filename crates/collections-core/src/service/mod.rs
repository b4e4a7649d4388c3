//! # Collection Service
//!
//! The main service implementing the collections APIs.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `CollectionsApi` for CRUD and bulk operations
//! 2. Implements `RelationshipsApi` for scoped views and the Set Reconciler
//! 3. Uses dependency injection for all external dependencies
//!
//! Every operation resolves the addressed collection through one shared
//! lookup helper (existence, soft-delete, permission) before doing any work.

mod collections;
mod reconciler;

use crate::domain::entities::{Collection, CollectionId, Node, NodeId, Principal, TargetKind};
use crate::domain::errors::{CollectionError, CollectionResult, ResourceKind};
use crate::ports::outbound::{
    AuthorizationGate, CollectionStore, LinkStore, NodeStore, TimeSource,
};

/// Access level a lookup must establish before an operation proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    View,
    Edit,
    Admin,
}

/// The Collection Service.
///
/// Implements `CollectionsApi` (CRUD, bulk) and `RelationshipsApi`
/// (scoped views, reconciliation, legacy node links).
pub struct CollectionService<CS, NS, LS, AG, TS>
where
    CS: CollectionStore,
    NS: NodeStore,
    LS: LinkStore,
    AG: AuthorizationGate,
    TS: TimeSource,
{
    pub(crate) collections: CS,
    pub(crate) nodes: NS,
    pub(crate) links: LS,
    pub(crate) gate: AG,
    pub(crate) time: TS,
}

/// Dependencies for CollectionService
pub struct ServiceDependencies<CS, NS, LS, AG, TS> {
    pub collections: CS,
    pub nodes: NS,
    pub links: LS,
    pub gate: AG,
    pub time: TS,
}

impl<CS, NS, LS, AG, TS> CollectionService<CS, NS, LS, AG, TS>
where
    CS: CollectionStore,
    NS: NodeStore,
    LS: LinkStore,
    AG: AuthorizationGate,
    TS: TimeSource,
{
    pub fn new(deps: ServiceDependencies<CS, NS, LS, AG, TS>) -> Self {
        Self {
            collections: deps.collections,
            nodes: deps.nodes,
            links: deps.links,
            gate: deps.gate,
            time: deps.time,
        }
    }

    /// Shared collection lookup: resolve-by-id, soft-delete check, then the
    /// permission check for the requested access level.
    ///
    /// Anonymous principals failing a permission check get
    /// `Unauthenticated`; authenticated ones get `Forbidden`.
    pub(crate) fn resolve_collection(
        &self,
        principal: &Principal,
        id: CollectionId,
        access: Access,
    ) -> CollectionResult<Collection> {
        let collection = self
            .collections
            .get(id)
            .filter(|c| !c.is_deleted)
            .ok_or(CollectionError::not_found(ResourceKind::Collection, id))?;

        let allowed = match access {
            Access::View => self.gate.can_view_collection(principal, &collection),
            Access::Edit => self.gate.can_edit_collection(principal, &collection),
            Access::Admin => self.gate.has_admin_on_collection(principal, &collection),
        };

        if !allowed {
            if principal.is_anonymous() {
                return Err(CollectionError::Unauthenticated);
            }
            let verb = match access {
                Access::View => "view",
                Access::Edit => "edit",
                Access::Admin => "administer",
            };
            return Err(CollectionError::forbidden(format!(
                "user may not {verb} collection {id}"
            )));
        }

        Ok(collection)
    }

    /// The live target of `id`, regardless of kind. Soft-deleted targets do
    /// not resolve.
    pub(crate) fn live_target(&self, id: NodeId) -> Option<Node> {
        self.nodes.get(id).filter(Node::is_live)
    }

    /// The scoped current id set of `collection`: targets that are live and
    /// of the expected kind, in link insertion order.
    pub(crate) fn scoped_target_ids(&self, collection: CollectionId, kind: TargetKind) -> Vec<NodeId> {
        self.links
            .links_of(collection)
            .into_iter()
            .filter(|link| {
                self.live_target(link.target_id)
                    .is_some_and(|node| node.kind == kind)
            })
            .map(|link| link.target_id)
            .collect()
    }

    /// Bump the collection's modification timestamp and persist it.
    pub(crate) fn touch(&mut self, mut collection: Collection) {
        collection.date_modified = self.time.now();
        self.collections.put(collection);
    }
}
