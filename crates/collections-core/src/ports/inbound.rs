//! # Inbound Ports (Driving Ports)
//!
//! The primary APIs of the collections subsystem. The HTTP layer drives the
//! service exclusively through these traits.

use crate::domain::entities::{
    Collection, CollectionId, LinkId, Node, NodeId, NodeLink, Principal, TargetKind,
};
use crate::domain::errors::CollectionResult;
use crate::domain::value_objects::{CollectionPatch, ListFilter, ReconcileMode};

/// Collection CRUD and bulk operations.
pub trait CollectionsApi {
    /// List collections visible to `principal`, newest-modified first.
    ///
    /// Anonymous principals see public collections; authenticated principals
    /// see their own. Soft-deleted collections never appear.
    fn list_collections(&self, principal: &Principal, filter: &ListFilter) -> Vec<Collection>;

    /// Create a collection owned by `principal`.
    ///
    /// ## Errors
    ///
    /// - `Unauthenticated`: anonymous principal
    /// - `Validation`: empty or over-long title
    fn create_collection(
        &mut self,
        principal: &Principal,
        title: &str,
        is_public: bool,
    ) -> CollectionResult<Collection>;

    /// Fetch one collection.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: id unknown, soft-deleted, or not visible to `principal`
    fn get_collection(
        &self,
        principal: &Principal,
        id: CollectionId,
    ) -> CollectionResult<Collection>;

    /// Update one collection's attributes.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: id unknown or soft-deleted
    /// - `Unauthenticated` / `Forbidden`: no edit permission
    /// - `Validation`: empty or over-long title
    fn update_collection(
        &mut self,
        principal: &Principal,
        id: CollectionId,
        patch: CollectionPatch,
    ) -> CollectionResult<Collection>;

    /// Soft-delete one collection and detach all of its links.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: id unknown or already deleted
    /// - `Unauthenticated` / `Forbidden`: no edit permission
    fn delete_collection(&mut self, principal: &Principal, id: CollectionId)
        -> CollectionResult<()>;

    /// Apply attribute patches to several collections at once.
    ///
    /// Every addressed collection must be editable by `principal`; the first
    /// miss aborts the whole batch before any write.
    ///
    /// ## Errors
    ///
    /// - `Validation`: batch exceeds the bulk limit
    /// - `NotFound` / `Forbidden` / `Unauthenticated`: as per single update
    fn bulk_update_collections(
        &mut self,
        principal: &Principal,
        patches: Vec<(CollectionId, CollectionPatch)>,
    ) -> CollectionResult<Vec<Collection>>;

    /// Soft-delete several collections at once.
    ///
    /// Requires admin permission on every item; the first miss aborts the
    /// whole batch before any delete.
    fn bulk_delete_collections(
        &mut self,
        principal: &Principal,
        ids: Vec<CollectionId>,
    ) -> CollectionResult<()>;
}

/// Linked-target views and the Set Reconciler.
pub trait RelationshipsApi {
    /// The live targets of `collection` whose kind matches `kind`,
    /// newest-modified first.
    ///
    /// A collection holding a mixed set reports only the matching subtype
    /// through each scoped view; the other links remain physically present.
    fn linked_targets(
        &self,
        principal: &Principal,
        collection: CollectionId,
        kind: TargetKind,
    ) -> CollectionResult<Vec<Node>>;

    /// Reconcile the scoped link set of `collection` against `requested`.
    ///
    /// Duplicates in `requested` collapse idempotently. Additions are
    /// validated in request order — existence/kind before read permission —
    /// and applied all-or-nothing. Removals are idempotent. The collection's
    /// modification timestamp is touched exactly once, even for an empty
    /// diff. Returns the post-mutation scoped id set.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: collection unknown, or an added id does not resolve to
    ///   a live target of `kind`
    /// - `Unauthenticated` / `Forbidden`: no edit permission on the
    ///   collection, or no read access to an added target
    fn reconcile_links(
        &mut self,
        principal: &Principal,
        collection: CollectionId,
        kind: TargetKind,
        requested: &[NodeId],
        mode: ReconcileMode,
    ) -> CollectionResult<Vec<NodeId>>;

    /// All live links of `collection`, either kind, with resolved targets.
    fn node_links(
        &self,
        principal: &Principal,
        collection: CollectionId,
    ) -> CollectionResult<Vec<(NodeLink, Node)>>;

    /// Create a single link to `target`.
    ///
    /// ## Errors
    ///
    /// - `Validation` (conflict): target already linked
    /// - `NotFound` / `Forbidden`: as per reconciliation additions
    fn create_node_link(
        &mut self,
        principal: &Principal,
        collection: CollectionId,
        target: NodeId,
    ) -> CollectionResult<NodeLink>;

    /// Fetch a single link by id, with its resolved target.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: link id unknown or target dead
    /// - `Validation`: link belongs to a different collection
    fn get_node_link(
        &self,
        principal: &Principal,
        collection: CollectionId,
        link: LinkId,
    ) -> CollectionResult<(NodeLink, Node)>;

    /// Destroy a single link by id.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: link id unknown
    /// - `Validation`: link belongs to a different collection
    /// - `Unauthenticated` / `Forbidden`: no edit permission
    fn delete_node_link(
        &mut self,
        principal: &Principal,
        collection: CollectionId,
        link: LinkId,
    ) -> CollectionResult<()>;

    /// Destroy several links by id. Every link must belong to `collection`;
    /// the first mismatch aborts before any delete.
    fn bulk_delete_node_links(
        &mut self,
        principal: &Principal,
        collection: CollectionId,
        links: Vec<LinkId>,
    ) -> CollectionResult<()>;
}
