use mingle_notify_domain::{Calendar, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDTO {
    pub id: ID,
    pub owner_user_id: ID,
    pub name: String,
    pub members: Vec<ID>,
}

impl CalendarDTO {
    pub fn new(calendar: Calendar) -> Self {
        Self {
            id: calendar.id,
            owner_user_id: calendar.owner_user_id,
            name: calendar.name,
            members: calendar.members,
        }
    }
}
