//! # Service Flow Tests
//!
//! End-to-end scenarios driven through the inbound ports, with stores seeded
//! before the service takes ownership of them.

#[cfg(test)]
use std::collections::HashMap;

#[cfg(test)]
use chrono::Utc;

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use collections_core::adapters::{
    ContributorGate, InMemoryCollectionStore, InMemoryLinkStore, InMemoryNodeStore,
    SystemTimeSource,
};

#[cfg(test)]
use collections_core::ports::outbound::NodeStore;

#[cfg(test)]
use collections_core::{
    CollectionService, CollectionsApi, Node, NodeId, Permission, Principal, ReconcileMode,
    RelationshipsApi, ServiceDependencies, TargetKind, UserId,
};

#[cfg(test)]
fn make_node(kind: TargetKind, is_public: bool) -> Node {
    let now = Utc::now();
    Node {
        id: Uuid::new_v4(),
        title: "seeded node".to_string(),
        kind,
        is_public,
        is_deleted: false,
        contributors: HashMap::new(),
        date_created: now,
        date_modified: now,
    }
}

#[cfg(test)]
type Service = CollectionService<
    InMemoryCollectionStore,
    InMemoryNodeStore,
    InMemoryLinkStore,
    ContributorGate,
    SystemTimeSource,
>;

#[cfg(test)]
fn make_service(nodes: Vec<Node>) -> Service {
    let mut node_store = InMemoryNodeStore::new();
    for node in nodes {
        node_store.put(node);
    }
    CollectionService::new(ServiceDependencies {
        collections: InMemoryCollectionStore::new(),
        nodes: node_store,
        links: InMemoryLinkStore::new(),
        gate: ContributorGate::new(),
        time: SystemTimeSource,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The canonical walkthrough: replace grows the set, remove shrinks it.
    #[test]
    fn test_put_then_delete_walkthrough() {
        let n1 = make_node(TargetKind::Project, true);
        let n2 = make_node(TargetKind::Project, true);
        let (id1, id2) = (n1.id, n2.id);
        let mut service = make_service(vec![n1, n2]);

        let owner = Principal::User(Uuid::new_v4());
        let collection = service.create_collection(&owner, "walkthrough", false).unwrap();

        // Start with {N1}.
        service
            .reconcile_links(
                &owner,
                collection.id,
                TargetKind::Project,
                &[id1],
                ReconcileMode::CreateOnly,
            )
            .unwrap();

        // PUT {N1, N2}: N2 created, N1 untouched.
        let set = service
            .reconcile_links(
                &owner,
                collection.id,
                TargetKind::Project,
                &[id1, id2],
                ReconcileMode::Replace,
            )
            .unwrap();
        let as_set: std::collections::HashSet<NodeId> = set.into_iter().collect();
        assert_eq!(as_set, std::collections::HashSet::from([id1, id2]));

        // DELETE {N1}: N2 remains.
        let set = service
            .reconcile_links(
                &owner,
                collection.id,
                TargetKind::Project,
                &[id1],
                ReconcileMode::Remove,
            )
            .unwrap();
        assert_eq!(set, vec![id2]);
    }

    /// A mixed collection keeps each scoped universe independent.
    #[test]
    fn test_mixed_set_reconciles_per_scope() {
        let project = make_node(TargetKind::Project, true);
        let registration = make_node(TargetKind::Registration, true);
        let (pid, rid) = (project.id, registration.id);
        let mut service = make_service(vec![project, registration]);

        let owner = Principal::User(Uuid::new_v4());
        let collection = service.create_collection(&owner, "mixed", false).unwrap();

        service
            .reconcile_links(
                &owner,
                collection.id,
                TargetKind::Project,
                &[pid],
                ReconcileMode::Replace,
            )
            .unwrap();
        service
            .reconcile_links(
                &owner,
                collection.id,
                TargetKind::Registration,
                &[rid],
                ReconcileMode::Replace,
            )
            .unwrap();

        // Clearing the registration scope leaves the project link standing.
        let cleared = service
            .reconcile_links(
                &owner,
                collection.id,
                TargetKind::Registration,
                &[],
                ReconcileMode::Replace,
            )
            .unwrap();
        assert!(cleared.is_empty());

        let projects = service
            .linked_targets(&owner, collection.id, TargetKind::Project)
            .unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, pid);
    }

    /// Contributor-only read access gates additions end to end.
    #[test]
    fn test_private_target_addition_depends_on_contributor_table() {
        let owner_id: UserId = Uuid::new_v4();
        let mut private = make_node(TargetKind::Project, false);
        private.contributors = HashMap::from([(owner_id, Permission::Read)]);
        let pid = private.id;

        let mut service = make_service(vec![private]);
        let owner = Principal::User(owner_id);
        let outsider = Principal::User(Uuid::new_v4());

        let mine = service.create_collection(&owner, "mine", false).unwrap();
        let theirs = service.create_collection(&outsider, "theirs", false).unwrap();

        // The contributor may add the private node.
        assert!(service
            .reconcile_links(
                &owner,
                mine.id,
                TargetKind::Project,
                &[pid],
                ReconcileMode::CreateOnly,
            )
            .is_ok());

        // The outsider owns their collection but cannot read the target.
        let err = service
            .reconcile_links(
                &outsider,
                theirs.id,
                TargetKind::Project,
                &[pid],
                ReconcileMode::CreateOnly,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            collections_core::CollectionError::Forbidden { .. }
        ));
    }

    /// Bulk collection lifecycle: create several, rename all, delete all.
    #[test]
    fn test_bulk_lifecycle() {
        let mut service = make_service(Vec::new());
        let owner = Principal::User(Uuid::new_v4());

        let a = service.create_collection(&owner, "a", false).unwrap();
        let b = service.create_collection(&owner, "b", false).unwrap();

        let renamed = service
            .bulk_update_collections(
                &owner,
                vec![
                    (a.id, collections_core::CollectionPatch::title("a2")),
                    (b.id, collections_core::CollectionPatch::title("b2")),
                ],
            )
            .unwrap();
        assert_eq!(renamed.len(), 2);
        assert!(renamed.iter().all(|c| c.title.ends_with('2')));

        service
            .bulk_delete_collections(&owner, vec![a.id, b.id])
            .unwrap();
        assert!(service
            .list_collections(&owner, &collections_core::ListFilter::default())
            .is_empty());
    }
}
