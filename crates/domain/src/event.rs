use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A published event on a `Calendar`. This is the store of record that the
/// goes-live dispatcher and the rule engine's event-attribute conditions read
/// from at evaluation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: ID,
    pub calendar_id: ID,
    pub host_user_id: ID,
    pub name: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: Option<String>,
    pub virtual_link: Option<String>,
    pub is_public: bool,
    /// Maximum number of guests, when the host capped the event.
    pub capacity: Option<i64>,
    pub created: i64,
    pub updated: i64,
}

impl CalendarEvent {
    /// Whether the event starts strictly after the given timestamp. Past
    /// events are never scheduled for goes-live notifications.
    pub fn starts_after(&self, ts: i64) -> bool {
        self.start_ts > ts
    }
}

impl Entity for CalendarEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Invited,
    Going,
    Maybe,
    Declined,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invited => "invited",
            Self::Going => "going",
            Self::Maybe => "maybe",
            Self::Declined => "declined",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid rsvp status: {0}")]
pub struct InvalidRsvpStatusError(String);

impl std::str::FromStr for RsvpStatus {
    type Err = InvalidRsvpStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invited" => Ok(Self::Invited),
            "going" => Ok(Self::Going),
            "maybe" => Ok(Self::Maybe),
            "declined" => Ok(Self::Declined),
            _ => Err(InvalidRsvpStatusError(s.to_string())),
        }
    }
}

/// A guest on a single `CalendarEvent`. The attendee list is always re-read
/// at dispatch time, so rows added or removed between scheduling and firing
/// are honored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    pub id: ID,
    pub event_id: ID,
    pub user_id: ID,
    pub rsvp: RsvpStatus,
}

impl Attendee {
    pub fn new(event_id: &ID, user_id: &ID) -> Self {
        Self {
            id: Default::default(),
            event_id: event_id.clone(),
            user_id: user_id.clone(),
            rsvp: RsvpStatus::Invited,
        }
    }
}

impl Entity for Attendee {
    fn id(&self) -> &ID {
        &self.id
    }
}
