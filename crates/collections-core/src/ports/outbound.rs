//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the collection service. The host application
//! supplies implementations; `adapters` provides the in-memory ones.

use crate::domain::entities::{
    Collection, CollectionId, LinkId, Node, NodeId, NodeLink, Principal,
};
use chrono::{DateTime, Utc};

/// Persistence for collection records.
pub trait CollectionStore: Send + Sync {
    /// Fetch a collection by id, soft-deleted ones included.
    fn get(&self, id: CollectionId) -> Option<Collection>;

    /// Insert or replace a collection record.
    fn put(&mut self, collection: Collection);

    /// All collection records, soft-deleted ones included.
    fn all(&self) -> Vec<Collection>;
}

/// Persistence for target node records.
pub trait NodeStore: Send + Sync {
    /// Fetch a node by id, soft-deleted ones included.
    fn get(&self, id: NodeId) -> Option<Node>;

    /// Insert or replace a node record.
    fn put(&mut self, node: Node);
}

/// Persistence for "collection links target" edge records.
///
/// The store enforces set semantics: at most one link per
/// (collection, target) pair.
pub trait LinkStore: Send + Sync {
    /// All links owned by `collection`, in insertion order.
    fn links_of(&self, collection: CollectionId) -> Vec<NodeLink>;

    /// Fetch a link by its own id.
    fn get(&self, link: LinkId) -> Option<NodeLink>;

    /// Fetch the link for a (collection, target) pair, if present.
    fn find(&self, collection: CollectionId, target: NodeId) -> Option<NodeLink>;

    /// Insert a link. Returns `false` without inserting when the
    /// (collection, target) pair already exists — duplicate creation from a
    /// race is a no-op, not an error.
    fn insert(&mut self, link: NodeLink) -> bool;

    /// Remove the link for a (collection, target) pair. Returns `false` when
    /// no such link existed.
    fn remove(&mut self, collection: CollectionId, target: NodeId) -> bool;

    /// Remove a link by its own id. Returns `false` when absent.
    fn remove_by_id(&mut self, link: LinkId) -> bool;

    /// Remove every link owned by `collection`. Returns the removed count.
    fn detach_all(&mut self, collection: CollectionId) -> usize;
}

/// Read/edit/admin decisions for a principal against a concrete object.
pub trait AuthorizationGate: Send + Sync {
    /// May `principal` see this collection in read views?
    fn can_view_collection(&self, principal: &Principal, collection: &Collection) -> bool;

    /// May `principal` mutate this collection and its link set?
    fn can_edit_collection(&self, principal: &Principal, collection: &Collection) -> bool;

    /// Does `principal` hold admin on this collection (bulk delete)?
    fn has_admin_on_collection(&self, principal: &Principal, collection: &Collection) -> bool;

    /// May `principal` read this target node? Required for every addition.
    fn can_read_node(&self, principal: &Principal, node: &Node) -> bool;
}

/// Clock abstraction, for testable timestamps.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
