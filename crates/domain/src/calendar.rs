use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A collection of `CalendarEvent`s curated by one owner. Members follow the
/// calendar and receive a notification when they join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub id: ID,
    pub owner_user_id: ID,
    pub name: String,
    pub members: Vec<ID>,
}

impl Calendar {
    pub fn new(owner_user_id: &ID, name: &str) -> Self {
        Self {
            id: Default::default(),
            owner_user_id: owner_user_id.clone(),
            name: name.to_string(),
            members: Vec::new(),
        }
    }

    pub fn is_member(&self, user_id: &ID) -> bool {
        self.members.contains(user_id)
    }
}

impl Entity for Calendar {
    fn id(&self) -> &ID {
        &self.id
    }
}
