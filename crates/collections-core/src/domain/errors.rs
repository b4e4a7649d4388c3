//! # Domain Errors
//!
//! Error taxonomy for the collections subsystem.
//!
//! Four outcomes cover every failure the service can surface:
//!
//! - [`CollectionError::NotFound`] — an id does not resolve to a live,
//!   correctly-typed entity
//! - [`CollectionError::Forbidden`] — the principal lacks the required
//!   permission on the collection or on a target being added
//! - [`CollectionError::Unauthenticated`] — an anonymous principal attempted
//!   a write
//! - [`CollectionError::Validation`] — a domain rule was violated
//!   (link/parent mismatch, duplicate pointer, malformed bulk payload)
//!
//! No panics in domain logic; everything is `Result`.

use crate::domain::entities::TargetKind;
use uuid::Uuid;

/// The kind of resource an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Collection,
    Node,
    Registration,
    NodeLink,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Collection => write!(f, "collection"),
            ResourceKind::Node => write!(f, "node"),
            ResourceKind::Registration => write!(f, "registration"),
            ResourceKind::NodeLink => write!(f, "node link"),
        }
    }
}

impl From<TargetKind> for ResourceKind {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Project => ResourceKind::Node,
            TargetKind::Registration => ResourceKind::Registration,
        }
    }
}

/// Errors surfaced by the collection service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// Id does not resolve to a live entity of the expected kind.
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: Uuid },

    /// Principal lacks the permission this operation requires.
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// Anonymous principal on an operation that requires credentials.
    #[error("authentication required")]
    Unauthenticated,

    /// Domain rule violation. `conflict` distinguishes a state conflict
    /// (duplicate pointer, type mismatch) from a malformed request.
    #[error("validation failed: {message}")]
    Validation { message: String, conflict: bool },
}

impl CollectionError {
    pub fn not_found(kind: ResourceKind, id: Uuid) -> Self {
        CollectionError::NotFound { kind, id }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        CollectionError::Forbidden {
            reason: reason.into(),
        }
    }

    /// A malformed-request violation.
    pub fn invalid(message: impl Into<String>) -> Self {
        CollectionError::Validation {
            message: message.into(),
            conflict: false,
        }
    }

    /// A state-conflict violation.
    pub fn conflict(message: impl Into<String>) -> Self {
        CollectionError::Validation {
            message: message.into(),
            conflict: true,
        }
    }
}

/// Result type for collection service operations.
pub type CollectionResult<T> = Result<T, CollectionError>;
