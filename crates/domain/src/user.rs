use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A member of the Mingle product. The notification engine only cares about
/// the fields that rules and templates can reference: the optional email
/// address, the audience segments and the join date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: ID,
    pub username: String,
    pub full_name: String,
    /// Users are allowed to sign up without an email address. Recipients
    /// without one are skipped by every dispatch path, never errored on.
    pub email: Option<String>,
    /// Audience segments the user belongs to, e.g. "hosts" or "beta".
    pub segments: Vec<String>,
    /// Millisecond timestamp of signup.
    pub joined_at: i64,
}

impl User {
    pub fn new(username: &str, full_name: &str, joined_at: i64) -> Self {
        Self {
            id: Default::default(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            email: None,
            segments: Vec::new(),
            joined_at,
        }
    }

    pub fn in_segment(&self, segment: &str) -> bool {
        self.segments.iter().any(|s| s == segment)
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
