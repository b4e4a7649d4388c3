//! # Collection CRUD Implementation
//!
//! Implements the CollectionsApi trait: list/create/get/update/delete plus
//! the bulk variants.

use super::{Access, CollectionService};
use crate::domain::entities::{Collection, CollectionId, Principal};
use crate::domain::errors::{CollectionError, CollectionResult};
use crate::domain::value_objects::{CollectionPatch, ListFilter, BULK_OPERATION_LIMIT, MAX_TITLE_LEN};
use crate::ports::inbound::CollectionsApi;
use crate::ports::outbound::{
    AuthorizationGate, CollectionStore, LinkStore, NodeStore, TimeSource,
};
use uuid::Uuid;

/// Reject empty and over-long titles.
fn validated_title(title: &str) -> CollectionResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CollectionError::invalid("title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CollectionError::invalid(format!(
            "title exceeds {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn check_bulk_len(len: usize) -> CollectionResult<()> {
    if len == 0 {
        return Err(CollectionError::invalid("bulk request body is empty"));
    }
    if len > BULK_OPERATION_LIMIT {
        return Err(CollectionError::invalid(format!(
            "bulk request exceeds limit of {BULK_OPERATION_LIMIT} resources"
        )));
    }
    Ok(())
}

impl<CS, NS, LS, AG, TS> CollectionsApi for CollectionService<CS, NS, LS, AG, TS>
where
    CS: CollectionStore,
    NS: NodeStore,
    LS: LinkStore,
    AG: AuthorizationGate,
    TS: TimeSource,
{
    fn list_collections(&self, principal: &Principal, filter: &ListFilter) -> Vec<Collection> {
        let mut visible: Vec<Collection> = self
            .collections
            .all()
            .into_iter()
            .filter(|c| !c.is_deleted)
            .filter(|c| self.gate.can_view_collection(principal, c))
            .filter(|c| filter.matches(&c.title))
            .collect();
        visible.sort_by(|a, b| b.date_modified.cmp(&a.date_modified));
        visible
    }

    fn create_collection(
        &mut self,
        principal: &Principal,
        title: &str,
        is_public: bool,
    ) -> CollectionResult<Collection> {
        let creator = principal
            .user_id()
            .ok_or(CollectionError::Unauthenticated)?;
        let title = validated_title(title)?;

        let mut collection = Collection::new(Uuid::new_v4(), title, creator, self.time.now());
        collection.is_public = is_public;
        tracing::info!(collection = %collection.id, %creator, "collection created");
        self.collections.put(collection.clone());
        Ok(collection)
    }

    fn get_collection(
        &self,
        principal: &Principal,
        id: CollectionId,
    ) -> CollectionResult<Collection> {
        self.resolve_collection(principal, id, Access::View)
    }

    fn update_collection(
        &mut self,
        principal: &Principal,
        id: CollectionId,
        patch: CollectionPatch,
    ) -> CollectionResult<Collection> {
        let mut collection = self.resolve_collection(principal, id, Access::Edit)?;

        if let Some(title) = &patch.title {
            collection.title = validated_title(title)?;
        }
        if let Some(is_public) = patch.is_public {
            collection.is_public = is_public;
        }
        collection.date_modified = self.time.now();
        self.collections.put(collection.clone());
        Ok(collection)
    }

    fn delete_collection(
        &mut self,
        principal: &Principal,
        id: CollectionId,
    ) -> CollectionResult<()> {
        let mut collection = self.resolve_collection(principal, id, Access::Edit)?;

        let detached = self.links.detach_all(collection.id);
        collection.is_deleted = true;
        collection.date_modified = self.time.now();
        tracing::info!(collection = %collection.id, detached, "collection deleted");
        self.collections.put(collection);
        Ok(())
    }

    fn bulk_update_collections(
        &mut self,
        principal: &Principal,
        patches: Vec<(CollectionId, CollectionPatch)>,
    ) -> CollectionResult<Vec<Collection>> {
        check_bulk_len(patches.len())?;

        // Resolve and validate everything before the first write.
        let mut staged = Vec::with_capacity(patches.len());
        for (id, patch) in patches {
            let mut collection = self.resolve_collection(principal, id, Access::Edit)?;
            if let Some(title) = &patch.title {
                collection.title = validated_title(title)?;
            }
            if let Some(is_public) = patch.is_public {
                collection.is_public = is_public;
            }
            staged.push(collection);
        }

        let now = self.time.now();
        for collection in &mut staged {
            collection.date_modified = now;
            self.collections.put(collection.clone());
        }
        Ok(staged)
    }

    fn bulk_delete_collections(
        &mut self,
        principal: &Principal,
        ids: Vec<CollectionId>,
    ) -> CollectionResult<()> {
        check_bulk_len(ids.len())?;

        // Admin on every item, checked before any delete.
        let mut staged = Vec::with_capacity(ids.len());
        for id in ids {
            staged.push(self.resolve_collection(principal, id, Access::Admin)?);
        }

        let now = self.time.now();
        for mut collection in staged {
            self.links.detach_all(collection.id);
            collection.is_deleted = true;
            collection.date_modified = now;
            tracing::info!(collection = %collection.id, "collection bulk-deleted");
            self.collections.put(collection);
        }
        Ok(())
    }
}
