//! In-memory implementations of the store ports.

use crate::domain::entities::{Collection, CollectionId, LinkId, Node, NodeId, NodeLink};
use crate::ports::outbound::{CollectionStore, LinkStore, NodeStore};
use std::collections::{HashMap, HashSet};

/// In-memory collection store.
#[derive(Default)]
pub struct InMemoryCollectionStore {
    records: HashMap<CollectionId, Collection>,
}

impl InMemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionStore for InMemoryCollectionStore {
    fn get(&self, id: CollectionId) -> Option<Collection> {
        self.records.get(&id).cloned()
    }

    fn put(&mut self, collection: Collection) {
        self.records.insert(collection.id, collection);
    }

    fn all(&self) -> Vec<Collection> {
        self.records.values().cloned().collect()
    }
}

/// In-memory node store.
#[derive(Default)]
pub struct InMemoryNodeStore {
    records: HashMap<NodeId, Node>,
}

impl InMemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeStore for InMemoryNodeStore {
    fn get(&self, id: NodeId) -> Option<Node> {
        self.records.get(&id).cloned()
    }

    fn put(&mut self, node: Node) {
        self.records.insert(node.id, node);
    }
}

/// In-memory link store.
///
/// Keeps links in insertion order and enforces the one-link-per-pair
/// uniqueness constraint with a side index.
#[derive(Default)]
pub struct InMemoryLinkStore {
    links: Vec<NodeLink>,
    pairs: HashSet<(CollectionId, NodeId)>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkStore for InMemoryLinkStore {
    fn links_of(&self, collection: CollectionId) -> Vec<NodeLink> {
        self.links
            .iter()
            .filter(|l| l.collection_id == collection)
            .cloned()
            .collect()
    }

    fn get(&self, link: LinkId) -> Option<NodeLink> {
        self.links.iter().find(|l| l.id == link).cloned()
    }

    fn find(&self, collection: CollectionId, target: NodeId) -> Option<NodeLink> {
        self.links
            .iter()
            .find(|l| l.collection_id == collection && l.target_id == target)
            .cloned()
    }

    fn insert(&mut self, link: NodeLink) -> bool {
        if !self.pairs.insert((link.collection_id, link.target_id)) {
            return false;
        }
        self.links.push(link);
        true
    }

    fn remove(&mut self, collection: CollectionId, target: NodeId) -> bool {
        if !self.pairs.remove(&(collection, target)) {
            return false;
        }
        self.links
            .retain(|l| !(l.collection_id == collection && l.target_id == target));
        true
    }

    fn remove_by_id(&mut self, link: LinkId) -> bool {
        let Some(found) = self.links.iter().find(|l| l.id == link).cloned() else {
            return false;
        };
        self.pairs.remove(&(found.collection_id, found.target_id));
        self.links.retain(|l| l.id != link);
        true
    }

    fn detach_all(&mut self, collection: CollectionId) -> usize {
        let before = self.links.len();
        self.pairs.retain(|(c, _)| *c != collection);
        self.links.retain(|l| l.collection_id != collection);
        before - self.links.len()
    }
}
