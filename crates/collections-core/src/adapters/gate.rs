//! Authorization gate backed by ownership and contributor tables.

use crate::domain::entities::{Collection, Node, Permission, Principal};
use crate::ports::outbound::AuthorizationGate;

/// Permission decisions from the records themselves.
///
/// Collections are private to their creator unless flagged public; the
/// creator holds implicit admin. Node read access comes from the node's
/// public flag or its contributor table.
#[derive(Default)]
pub struct ContributorGate;

impl ContributorGate {
    pub fn new() -> Self {
        Self
    }
}

impl AuthorizationGate for ContributorGate {
    fn can_view_collection(&self, principal: &Principal, collection: &Collection) -> bool {
        collection.is_public || principal.user_id() == Some(collection.creator)
    }

    fn can_edit_collection(&self, principal: &Principal, collection: &Collection) -> bool {
        principal.user_id() == Some(collection.creator)
    }

    fn has_admin_on_collection(&self, principal: &Principal, collection: &Collection) -> bool {
        principal.user_id() == Some(collection.creator)
    }

    fn can_read_node(&self, principal: &Principal, node: &Node) -> bool {
        if node.is_public {
            return true;
        }
        match principal.user_id() {
            Some(user) => node.permission_of(user) >= Some(Permission::Read),
            None => false,
        }
    }
}
