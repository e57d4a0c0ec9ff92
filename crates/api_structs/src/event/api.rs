use crate::dtos::{AttendeeDTO, CalendarEventDTO};
use mingle_notify_domain::{Attendee, CalendarEvent, RsvpStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventResponse {
    pub event: CalendarEventDTO,
}

impl CalendarEventResponse {
    pub fn new(event: CalendarEvent) -> Self {
        Self {
            event: CalendarEventDTO::new(event),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub attendee: AttendeeDTO,
}

impl AttendeeResponse {
    pub fn new(attendee: Attendee) -> Self {
        Self {
            attendee: AttendeeDTO::new(attendee),
        }
    }
}

pub mod create_event {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub calendar_id: ID,
        pub host_user_id: ID,
        pub name: String,
        pub start_ts: i64,
        pub end_ts: i64,
        pub location: Option<String>,
        pub virtual_link: Option<String>,
        pub is_public: Option<bool>,
        pub capacity: Option<i64>,
    }

    pub type APIResponse = CalendarEventResponse;
}

pub mod get_event {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = CalendarEventResponse;
}

pub mod add_attendee {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: ID,
    }

    pub type APIResponse = AttendeeResponse;
}

pub mod rsvp_event {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: ID,
        pub rsvp: RsvpStatus,
    }

    pub type APIResponse = AttendeeResponse;
}

pub mod schedule_goes_live {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Attendees considered at schedule time, not a delivery guarantee.
        pub attendees: usize,
        pub scheduled: bool,
    }
}
