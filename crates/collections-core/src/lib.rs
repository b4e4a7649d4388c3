//! # Collections Core
//!
//! Domain model and services for user-curated collections of project nodes
//! and registrations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     COLLECTIONS CORE                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ports/inbound      CollectionsApi, RelationshipsApi          │
//! │        │                                                      │
//! │  ┌─────┴──────────────────────────────┐                       │
//! │  │        CollectionService           │                       │
//! │  │  CRUD / bulk ops / Set Reconciler  │                       │
//! │  └─────┬──────────────────────────────┘                       │
//! │        │                                                      │
//! │  ports/outbound     CollectionStore, NodeStore, LinkStore,    │
//! │                     AuthorizationGate, TimeSource             │
//! │        │                                                      │
//! │  adapters/          In-memory store implementations           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The Set Reconciler is the heart of the crate: given a collection's current
//! link set and a caller-requested target set, it computes the minimal
//! add/remove diff and applies it under per-item authorization. Additions are
//! all-or-nothing; removals are idempotent.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::{
    Collection, CollectionId, LinkId, Node, NodeId, NodeLink, Permission, Principal, TargetKind,
    UserId,
};
pub use domain::errors::{CollectionError, ResourceKind};
pub use domain::value_objects::{
    CollectionPatch, ListFilter, ReconcileMode, BULK_OPERATION_LIMIT, MAX_TITLE_LEN,
};
pub use ports::inbound::{CollectionsApi, RelationshipsApi};
pub use service::{CollectionService, ServiceDependencies};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
