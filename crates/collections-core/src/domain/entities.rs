//! # Domain Entities
//!
//! Core data types: collections, linkable target nodes, and the edge records
//! that tie them together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Identifier of a user account.
pub type UserId = Uuid;

/// Identifier of a collection.
pub type CollectionId = Uuid;

/// Identifier of a target node (project or registration).
pub type NodeId = Uuid;

/// Identifier of a node link edge record.
pub type LinkId = Uuid;

/// The requesting principal, resolved by the caller from credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// No credentials presented.
    Anonymous,
    /// An authenticated user.
    User(UserId),
}

impl Principal {
    /// The authenticated user id, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Principal::Anonymous => None,
            Principal::User(id) => Some(*id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Principal::Anonymous)
    }
}

/// Subtype tag of a linkable target.
///
/// Projects and registrations share one node table and one edge table; the
/// tag is what scoped views and the reconciler match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// A live project or component node.
    Project,
    /// An immutable snapshot of a project node.
    Registration,
}

/// Permission level a contributor holds on a node.
///
/// Ordered: `Admin` implies `Write` implies `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Admin,
}

/// A user-owned grouping of links to project and registration nodes.
///
/// Collections never nest: a collection is not itself a linkable target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    /// The creating user; owns the collection and holds implicit admin.
    pub creator: UserId,
    pub is_public: bool,
    /// Soft-delete flag. Deleted collections vanish from all read views.
    pub is_deleted: bool,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl Collection {
    pub fn new(id: CollectionId, title: String, creator: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            creator,
            is_public: false,
            is_deleted: false,
            date_created: now,
            date_modified: now,
        }
    }
}

/// A linkable target entity: a project/component node or a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    pub kind: TargetKind,
    pub is_public: bool,
    pub is_deleted: bool,
    /// Contributor table: user id to permission level.
    pub contributors: HashMap<UserId, Permission>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl Node {
    /// Whether this node is visible at all (not soft-deleted).
    pub fn is_live(&self) -> bool {
        !self.is_deleted
    }

    /// The permission level `user` holds on this node, if a contributor.
    pub fn permission_of(&self, user: UserId) -> Option<Permission> {
        self.contributors.get(&user).copied()
    }
}

/// A single directed edge record from a collection to a target node.
///
/// At most one link exists per (collection, target) pair. The link is owned
/// by the collection: deleting the collection destroys its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLink {
    pub id: LinkId,
    pub collection_id: CollectionId,
    pub target_id: NodeId,
    pub date_created: DateTime<Utc>,
}

impl NodeLink {
    pub fn new(
        id: LinkId,
        collection_id: CollectionId,
        target_id: NodeId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            collection_id,
            target_id,
            date_created: now,
        }
    }
}
