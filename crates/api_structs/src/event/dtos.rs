use mingle_notify_domain::{Attendee, CalendarEvent, RsvpStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventDTO {
    pub id: ID,
    pub calendar_id: ID,
    pub host_user_id: ID,
    pub name: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: Option<String>,
    pub virtual_link: Option<String>,
    pub is_public: bool,
    pub capacity: Option<i64>,
}

impl CalendarEventDTO {
    pub fn new(event: CalendarEvent) -> Self {
        Self {
            id: event.id,
            calendar_id: event.calendar_id,
            host_user_id: event.host_user_id,
            name: event.name,
            start_ts: event.start_ts,
            end_ts: event.end_ts,
            location: event.location,
            virtual_link: event.virtual_link,
            is_public: event.is_public,
            capacity: event.capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeDTO {
    pub id: ID,
    pub event_id: ID,
    pub user_id: ID,
    pub rsvp: RsvpStatus,
}

impl AttendeeDTO {
    pub fn new(attendee: Attendee) -> Self {
        Self {
            id: attendee.id,
            event_id: attendee.event_id,
            user_id: attendee.user_id,
            rsvp: attendee.rsvp,
        }
    }
}
