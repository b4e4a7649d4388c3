//! # Set Reconciler Implementation
//!
//! Implements the RelationshipsApi trait: scoped read views, the
//! reconciliation algorithm for relationship writes, and the legacy
//! node-link operations that manipulate the same edge records.
//!
//! ## Reconciliation
//!
//! ```text
//! current  = live links of the collection, filtered to the scoped kind
//! requested = caller ids, duplicates collapsed, caller order kept
//!
//! create-only:  to_add = requested − current      to_remove = ∅
//! replace:      to_add = requested − current      to_remove = current − requested
//! remove:       to_add = ∅                        to_remove = requested ∩ current
//! ```
//!
//! Additions are validated in request order — existence and kind before read
//! permission — and the first violation aborts before any mutation.
//! Removals are idempotent. The collection's modification timestamp is
//! touched exactly once per call, even when both diffs are empty.

use super::{Access, CollectionService};
use crate::domain::entities::{
    CollectionId, LinkId, Node, NodeId, NodeLink, Principal, TargetKind,
};
use crate::domain::errors::{CollectionError, CollectionResult, ResourceKind};
use crate::domain::value_objects::ReconcileMode;
use crate::ports::inbound::RelationshipsApi;
use crate::ports::outbound::{
    AuthorizationGate, CollectionStore, LinkStore, NodeStore, TimeSource,
};
use std::collections::HashSet;
use uuid::Uuid;

/// Collapse duplicates while keeping first-occurrence order.
fn dedup_ordered(ids: &[NodeId]) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    ids.iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

impl<CS, NS, LS, AG, TS> CollectionService<CS, NS, LS, AG, TS>
where
    CS: CollectionStore,
    NS: NodeStore,
    LS: LinkStore,
    AG: AuthorizationGate,
    TS: TimeSource,
{
    /// Resolve an addition candidate: it must be a live node of the expected
    /// kind, and the principal must be able to read it.
    ///
    /// Existence and kind are checked before permission, so a dangling id
    /// reports `NotFound` even when permission would also have failed.
    fn resolve_addition(
        &self,
        principal: &Principal,
        id: NodeId,
        kind: TargetKind,
    ) -> CollectionResult<Node> {
        let node = self
            .live_target(id)
            .filter(|node| node.kind == kind)
            .ok_or(CollectionError::not_found(ResourceKind::from(kind), id))?;

        if !self.gate.can_read_node(principal, &node) {
            return Err(CollectionError::forbidden(format!(
                "user may not read {} {id}",
                ResourceKind::from(kind)
            )));
        }
        Ok(node)
    }
}

impl<CS, NS, LS, AG, TS> RelationshipsApi for CollectionService<CS, NS, LS, AG, TS>
where
    CS: CollectionStore,
    NS: NodeStore,
    LS: LinkStore,
    AG: AuthorizationGate,
    TS: TimeSource,
{
    fn linked_targets(
        &self,
        principal: &Principal,
        collection: CollectionId,
        kind: TargetKind,
    ) -> CollectionResult<Vec<Node>> {
        let collection = self.resolve_collection(principal, collection, Access::View)?;

        let mut targets: Vec<Node> = self
            .links
            .links_of(collection.id)
            .into_iter()
            .filter_map(|link| self.live_target(link.target_id))
            .filter(|node| node.kind == kind)
            .collect();
        targets.sort_by(|a, b| b.date_modified.cmp(&a.date_modified));
        Ok(targets)
    }

    fn reconcile_links(
        &mut self,
        principal: &Principal,
        collection: CollectionId,
        kind: TargetKind,
        requested: &[NodeId],
        mode: ReconcileMode,
    ) -> CollectionResult<Vec<NodeId>> {
        // Edit permission on the collection, once, before any per-item work.
        let collection = self.resolve_collection(principal, collection, Access::Edit)?;

        let current = self.scoped_target_ids(collection.id, kind);
        let current_set: HashSet<NodeId> = current.iter().copied().collect();

        let requested = dedup_ordered(requested);
        let requested_set: HashSet<NodeId> = requested.iter().copied().collect();

        let (to_add, to_remove): (Vec<NodeId>, Vec<NodeId>) = match mode {
            ReconcileMode::CreateOnly => (
                requested
                    .iter()
                    .copied()
                    .filter(|id| !current_set.contains(id))
                    .collect(),
                Vec::new(),
            ),
            ReconcileMode::Replace => (
                requested
                    .iter()
                    .copied()
                    .filter(|id| !current_set.contains(id))
                    .collect(),
                current
                    .iter()
                    .copied()
                    .filter(|id| !requested_set.contains(id))
                    .collect(),
            ),
            ReconcileMode::Remove => (
                Vec::new(),
                requested
                    .iter()
                    .copied()
                    .filter(|id| current_set.contains(id))
                    .collect(),
            ),
        };

        // Validate every addition before the first write: all-or-nothing.
        for id in &to_add {
            self.resolve_addition(principal, *id, kind)?;
        }

        let now = self.time.now();
        for id in &to_add {
            // A concurrent insert of the same pair is absorbed by the store's
            // uniqueness constraint.
            self.links
                .insert(NodeLink::new(Uuid::new_v4(), collection.id, *id, now));
        }
        for id in &to_remove {
            // Already-absent ids are no-ops, never errors.
            self.links.remove(collection.id, *id);
        }

        tracing::debug!(
            collection = %collection.id,
            added = to_add.len(),
            removed = to_remove.len(),
            "link set reconciled"
        );

        // One logical update per call, even for an empty diff: an empty
        // replace is a legal "clear all links".
        let id = collection.id;
        self.touch(collection);

        Ok(self.scoped_target_ids(id, kind))
    }

    fn node_links(
        &self,
        principal: &Principal,
        collection: CollectionId,
    ) -> CollectionResult<Vec<(NodeLink, Node)>> {
        let collection = self.resolve_collection(principal, collection, Access::View)?;

        Ok(self
            .links
            .links_of(collection.id)
            .into_iter()
            .filter_map(|link| {
                let node = self.live_target(link.target_id)?;
                Some((link, node))
            })
            .collect())
    }

    fn create_node_link(
        &mut self,
        principal: &Principal,
        collection: CollectionId,
        target: NodeId,
    ) -> CollectionResult<NodeLink> {
        let collection = self.resolve_collection(principal, collection, Access::Edit)?;

        let node = self
            .live_target(target)
            .ok_or(CollectionError::not_found(ResourceKind::Node, target))?;
        if !self.gate.can_read_node(principal, &node) {
            return Err(CollectionError::forbidden(format!(
                "user may not read node {target}"
            )));
        }
        if self.links.find(collection.id, target).is_some() {
            return Err(CollectionError::conflict(format!(
                "node {target} is already linked to this collection"
            )));
        }

        let link = NodeLink::new(Uuid::new_v4(), collection.id, target, self.time.now());
        self.links.insert(link.clone());
        self.touch(collection);
        Ok(link)
    }

    fn get_node_link(
        &self,
        principal: &Principal,
        collection: CollectionId,
        link: LinkId,
    ) -> CollectionResult<(NodeLink, Node)> {
        let collection = self.resolve_collection(principal, collection, Access::View)?;
        let link = self
            .links
            .get(link)
            .ok_or(CollectionError::not_found(ResourceKind::NodeLink, link))?;

        // Wrong parent is a domain-rule violation, not a missing resource.
        if link.collection_id != collection.id {
            return Err(CollectionError::invalid(
                "node link does not belong to this collection",
            ));
        }

        let node = self
            .live_target(link.target_id)
            .ok_or(CollectionError::not_found(
                ResourceKind::Node,
                link.target_id,
            ))?;
        Ok((link, node))
    }

    fn delete_node_link(
        &mut self,
        principal: &Principal,
        collection: CollectionId,
        link: LinkId,
    ) -> CollectionResult<()> {
        let collection = self.resolve_collection(principal, collection, Access::Edit)?;
        let link = self
            .links
            .get(link)
            .ok_or(CollectionError::not_found(ResourceKind::NodeLink, link))?;

        if link.collection_id != collection.id {
            return Err(CollectionError::invalid(
                "node link does not belong to this collection",
            ));
        }

        self.links.remove_by_id(link.id);
        self.touch(collection);
        Ok(())
    }

    fn bulk_delete_node_links(
        &mut self,
        principal: &Principal,
        collection: CollectionId,
        links: Vec<LinkId>,
    ) -> CollectionResult<()> {
        let collection = self.resolve_collection(principal, collection, Access::Edit)?;

        // Ownership verified for the whole batch before the first delete.
        let mut staged = Vec::with_capacity(links.len());
        for id in links {
            let link = self
                .links
                .get(id)
                .ok_or(CollectionError::not_found(ResourceKind::NodeLink, id))?;
            if link.collection_id != collection.id {
                return Err(CollectionError::invalid(
                    "node link does not belong to this collection",
                ));
            }
            staged.push(link.id);
        }

        for id in staged {
            self.links.remove_by_id(id);
        }
        self.touch(collection);
        Ok(())
    }
}
