//! # Value Objects
//!
//! Request-shaped values and domain limits.

use serde::{Deserialize, Serialize};

/// Maximum accepted collection title length, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum number of resources accepted in one bulk request.
pub const BULK_OPERATION_LIMIT: usize = 100;

/// How a relationship write maps onto the current link set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// POST semantics: add requested ids not currently linked, remove nothing.
    CreateOnly,
    /// PUT/PATCH semantics: make the link set equal the requested set.
    Replace,
    /// DELETE semantics: remove the intersection of requested and current.
    Remove,
}

/// Partial update of a collection's mutable attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPatch {
    pub title: Option<String>,
    pub is_public: Option<bool>,
}

impl CollectionPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            is_public: None,
        }
    }
}

/// Filter applied to the collection list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, title: &str) -> bool {
        match &self.title_contains {
            None => true,
            Some(needle) => title.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}
