use mingle_notify_domain::{User, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: ID,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub segments: Vec<String>,
    pub joined_at: i64,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            segments: user.segments,
            joined_at: user.joined_at,
        }
    }
}
