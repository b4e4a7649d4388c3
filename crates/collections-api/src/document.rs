//! JSON:API document types.
//!
//! Response documents wrap `data` (a resource, a resource list, or a list of
//! bare identifiers for relationship endpoints); request documents mirror
//! what clients send. Everything is serde-typed; handlers parse incoming
//! bodies from `serde_json::Value` so malformed payloads surface as JSON:API
//! validation errors rather than framework defaults.

use crate::error::ApiFailure;
use chrono::{DateTime, Utc};
use collections_core::{Collection, CollectionError, Node, NodeLink, TargetKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JSON:API resource type tags.
pub mod types {
    pub const COLLECTIONS: &str = "collections";
    pub const NODES: &str = "nodes";
    pub const REGISTRATIONS: &str = "registrations";
    pub const NODE_LINKS: &str = "node_links";
    pub const LINKED_NODES: &str = "linked_nodes";
    pub const LINKED_REGISTRATIONS: &str = "linked_registrations";
}

/// The relationship-identifier type tag for a scoped endpoint.
pub fn relationship_type(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Project => types::LINKED_NODES,
        TargetKind::Registration => types::LINKED_REGISTRATIONS,
    }
}

// ---------------------------------------------------------------------------
// Response documents
// ---------------------------------------------------------------------------

/// Top-level response document.
#[derive(Debug, Serialize)]
pub struct Document<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T: Serialize> Document<T> {
    pub fn new(data: T) -> Self {
        Self { data, meta: None }
    }

    pub fn paged(data: T, meta: PageMeta) -> Self {
        Self {
            data,
            meta: Some(meta),
        }
    }
}

/// Pagination metadata for list documents.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// A bare `{type, id}` pair, used by relationship endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CollectionAttributes {
    pub title: String,
    pub public: bool,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CollectionResource {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: Uuid,
    pub attributes: CollectionAttributes,
}

impl From<&Collection> for CollectionResource {
    fn from(collection: &Collection) -> Self {
        Self {
            kind: types::COLLECTIONS,
            id: collection.id,
            attributes: CollectionAttributes {
                title: collection.title.clone(),
                public: collection.is_public,
                date_created: collection.date_created,
                date_modified: collection.date_modified,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NodeAttributes {
    pub title: String,
    pub public: bool,
    pub registration: bool,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct NodeResource {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: Uuid,
    pub attributes: NodeAttributes,
}

impl From<&Node> for NodeResource {
    fn from(node: &Node) -> Self {
        Self {
            kind: match node.kind {
                TargetKind::Project => types::NODES,
                TargetKind::Registration => types::REGISTRATIONS,
            },
            id: node.id,
            attributes: NodeAttributes {
                title: node.title.clone(),
                public: node.is_public,
                registration: node.kind == TargetKind::Registration,
                date_created: node.date_created,
                date_modified: node.date_modified,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RelationshipData {
    pub data: ResourceIdentifier,
}

#[derive(Debug, Serialize)]
pub struct NodeLinkRelationships {
    pub target_node: RelationshipData,
}

#[derive(Debug, Serialize)]
pub struct NodeLinkResource {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: Uuid,
    pub relationships: NodeLinkRelationships,
}

impl NodeLinkResource {
    pub fn new(link: &NodeLink, target: &Node) -> Self {
        Self {
            kind: types::NODE_LINKS,
            id: link.id,
            relationships: NodeLinkRelationships {
                target_node: RelationshipData {
                    data: ResourceIdentifier {
                        kind: match target.kind {
                            TargetKind::Project => types::NODES.to_string(),
                            TargetKind::Registration => types::REGISTRATIONS.to_string(),
                        },
                        id: target.id,
                    },
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Request documents
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateAttributes {
    pub title: String,
    #[serde(default)]
    pub public: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: CreateAttributes,
}

/// `POST /collections/` body.
#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub data: CreateResource,
}

#[derive(Debug, Default, Deserialize)]
pub struct PatchAttributes {
    pub title: Option<String>,
    pub public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<Uuid>,
    #[serde(default)]
    pub attributes: PatchAttributes,
}

/// `PUT/PATCH /collections/{id}/` body.
#[derive(Debug, Deserialize)]
pub struct UpdateDocument {
    pub data: UpdateResource,
}

/// Bulk `PUT/PATCH/DELETE /collections/` body.
#[derive(Debug, Deserialize)]
pub struct BulkDocument {
    pub data: Vec<UpdateResource>,
}

/// Relationship write and node-link bulk-delete body.
#[derive(Debug, Deserialize)]
pub struct IdentifierListDocument {
    pub data: Vec<ResourceIdentifier>,
}

#[derive(Debug, Deserialize)]
pub struct TargetNodeRelationship {
    pub data: ResourceIdentifier,
}

#[derive(Debug, Deserialize)]
pub struct NodeLinkCreateRelationships {
    pub target_node: TargetNodeRelationship,
}

#[derive(Debug, Deserialize)]
pub struct NodeLinkCreateResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub relationships: NodeLinkCreateRelationships,
}

/// `POST /collections/{id}/node_links/` body.
#[derive(Debug, Deserialize)]
pub struct NodeLinkCreateDocument {
    pub data: NodeLinkCreateResource,
}

// ---------------------------------------------------------------------------
// Query parameters and pagination
// ---------------------------------------------------------------------------

/// Query parameters accepted by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "filter[title]")]
    pub filter_title: Option<String>,
    pub page: Option<usize>,
    #[serde(rename = "page[size]")]
    pub page_size: Option<usize>,
}

/// Slice `items` down to the requested page.
pub fn paginate<T>(
    items: Vec<T>,
    query: &ListQuery,
    default_size: usize,
    max_size: usize,
) -> (Vec<T>, PageMeta) {
    let total = items.len();
    let per_page = query.page_size.unwrap_or(default_size).clamp(1, max_size);
    let page = query.page.unwrap_or(1).max(1);

    let start = (page - 1).saturating_mul(per_page);
    let paged = items
        .into_iter()
        .skip(start)
        .take(per_page)
        .collect::<Vec<_>>();

    (
        paged,
        PageMeta {
            total,
            page,
            per_page,
        },
    )
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse a request body into a typed document, reporting malformation as a
/// validation error rather than a framework rejection.
pub fn parse_document<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiFailure> {
    serde_json::from_value(body)
        .map_err(|e| ApiFailure::from(CollectionError::invalid(format!("malformed payload: {e}"))))
}

/// Require the JSON:API `type` tag to match the endpoint's resource type.
/// A mismatch is a conflict, not a malformation.
pub fn expect_type(actual: &str, expected: &str) -> Result<(), ApiFailure> {
    if actual != expected {
        return Err(ApiFailure::from(CollectionError::conflict(format!(
            "resource type {actual:?} does not match endpoint type {expected:?}"
        ))));
    }
    Ok(())
}
