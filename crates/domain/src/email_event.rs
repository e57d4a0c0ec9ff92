use crate::event::RsvpStatus;
use crate::shared::entity::{Entity, ID};
use crate::template::TemplateData;
use crate::user::User;
use serde::{Deserialize, Serialize};

/// Enumerated category of a domain occurrence that can trigger email rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    EventInvitation,
    RsvpConfirmation,
    EventReminder,
    EventGoesLive,
    EventCancelled,
    CalendarMemberJoined,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventInvitation => "event_invitation",
            Self::RsvpConfirmation => "rsvp_confirmation",
            Self::EventReminder => "event_reminder",
            Self::EventGoesLive => "event_goes_live",
            Self::EventCancelled => "event_cancelled",
            Self::CalendarMemberJoined => "calendar_member_joined",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid event type: {0}")]
pub struct InvalidEventTypeError(String);

impl std::str::FromStr for EventType {
    type Err = InvalidEventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event_invitation" => Ok(Self::EventInvitation),
            "rsvp_confirmation" => Ok(Self::RsvpConfirmation),
            "event_reminder" => Ok(Self::EventReminder),
            "event_goes_live" => Ok(Self::EventGoesLive),
            "event_cancelled" => Ok(Self::EventCancelled),
            "calendar_member_joined" => Ok(Self::CalendarMemberJoined),
            _ => Err(InvalidEventTypeError(s.to_string())),
        }
    }
}

/// Typed payload of an `EmailEvent`, one variant per `EventType`. The serde
/// tag is the wire-level event type, so triggering clients send
/// `{"type": "event_goes_live", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmailEventPayload {
    EventInvitation {
        event_id: ID,
        event_name: String,
        host_name: String,
        start_ts: i64,
        location: Option<String>,
        virtual_link: Option<String>,
    },
    RsvpConfirmation {
        event_id: ID,
        event_name: String,
        start_ts: i64,
        rsvp: RsvpStatus,
    },
    EventReminder {
        event_id: ID,
        event_name: String,
        start_ts: i64,
        location: Option<String>,
        virtual_link: Option<String>,
    },
    EventGoesLive {
        event_id: ID,
        event_name: String,
        start_ts: i64,
        location: Option<String>,
        virtual_link: Option<String>,
    },
    EventCancelled {
        event_id: ID,
        event_name: String,
        start_ts: i64,
    },
    CalendarMemberJoined {
        calendar_id: ID,
        calendar_name: String,
    },
}

/// A typed operand or payload field value used by the condition interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl EmailEventPayload {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::EventInvitation { .. } => EventType::EventInvitation,
            Self::RsvpConfirmation { .. } => EventType::RsvpConfirmation,
            Self::EventReminder { .. } => EventType::EventReminder,
            Self::EventGoesLive { .. } => EventType::EventGoesLive,
            Self::EventCancelled { .. } => EventType::EventCancelled,
            Self::CalendarMemberJoined { .. } => EventType::CalendarMemberJoined,
        }
    }

    /// The `CalendarEvent` this payload refers to, when it refers to one.
    /// Used by the matcher to resolve event-attribute conditions.
    pub fn calendar_event_id(&self) -> Option<&ID> {
        match self {
            Self::EventInvitation { event_id, .. }
            | Self::RsvpConfirmation { event_id, .. }
            | Self::EventReminder { event_id, .. }
            | Self::EventGoesLive { event_id, .. }
            | Self::EventCancelled { event_id, .. } => Some(event_id),
            Self::CalendarMemberJoined { .. } => None,
        }
    }

    /// Named-field accessor backing the generic field/operator/value filters.
    /// Every filterable field is enumerated here, so there is no dynamic
    /// property-path evaluation anywhere in the matcher.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        let text = |s: &str| Some(FieldValue::Text(s.to_string()));
        let opt_text = |s: &Option<String>| s.as_ref().map(|v| FieldValue::Text(v.clone()));
        match self {
            Self::EventInvitation {
                event_id,
                event_name,
                host_name,
                start_ts,
                location,
                virtual_link,
            } => match name {
                "event_id" => text(&event_id.as_string()),
                "event_name" => text(event_name),
                "host_name" => text(host_name),
                "start_ts" => Some(FieldValue::Int(*start_ts)),
                "location" => opt_text(location),
                "virtual_link" => opt_text(virtual_link),
                _ => None,
            },
            Self::RsvpConfirmation {
                event_id,
                event_name,
                start_ts,
                rsvp,
            } => match name {
                "event_id" => text(&event_id.as_string()),
                "event_name" => text(event_name),
                "start_ts" => Some(FieldValue::Int(*start_ts)),
                "rsvp" => text(rsvp.as_str()),
                _ => None,
            },
            Self::EventReminder {
                event_id,
                event_name,
                start_ts,
                location,
                virtual_link,
            }
            | Self::EventGoesLive {
                event_id,
                event_name,
                start_ts,
                location,
                virtual_link,
            } => match name {
                "event_id" => text(&event_id.as_string()),
                "event_name" => text(event_name),
                "start_ts" => Some(FieldValue::Int(*start_ts)),
                "location" => opt_text(location),
                "virtual_link" => opt_text(virtual_link),
                _ => None,
            },
            Self::EventCancelled {
                event_id,
                event_name,
                start_ts,
            } => match name {
                "event_id" => text(&event_id.as_string()),
                "event_name" => text(event_name),
                "start_ts" => Some(FieldValue::Int(*start_ts)),
                _ => None,
            },
            Self::CalendarMemberJoined {
                calendar_id,
                calendar_name,
            } => match name {
                "calendar_id" => text(&calendar_id.as_string()),
                "calendar_name" => text(calendar_name),
                _ => None,
            },
        }
    }

    /// Variables handed to the template renderer for this payload and
    /// recipient. Start times are formatted as RFC 3339 in UTC so rendering
    /// stays deterministic.
    pub fn template_data(&self, user: &User) -> TemplateData {
        let mut data = TemplateData::new();
        data.insert("user_name".to_string(), user.full_name.clone());

        match self {
            Self::EventInvitation {
                event_name,
                host_name,
                start_ts,
                location,
                virtual_link,
                ..
            } => {
                data_insert(&mut data, "event_name", event_name.clone());
                data_insert(&mut data, "host_name", host_name.clone());
                data_insert(&mut data, "start_time", format_ts(*start_ts));
                data_insert(&mut data, "venue", venue(location, virtual_link));
            }
            Self::RsvpConfirmation {
                event_name,
                start_ts,
                rsvp,
                ..
            } => {
                data_insert(&mut data, "event_name", event_name.clone());
                data_insert(&mut data, "start_time", format_ts(*start_ts));
                data_insert(&mut data, "rsvp_status", rsvp.as_str().to_string());
            }
            Self::EventReminder {
                event_name,
                start_ts,
                location,
                virtual_link,
                ..
            }
            | Self::EventGoesLive {
                event_name,
                start_ts,
                location,
                virtual_link,
                ..
            } => {
                data_insert(&mut data, "event_name", event_name.clone());
                data_insert(&mut data, "start_time", format_ts(*start_ts));
                data_insert(&mut data, "venue", venue(location, virtual_link));
            }
            Self::EventCancelled {
                event_name,
                start_ts,
                ..
            } => {
                data_insert(&mut data, "event_name", event_name.clone());
                data_insert(&mut data, "start_time", format_ts(*start_ts));
            }
            Self::CalendarMemberJoined { calendar_name, .. } => {
                data_insert(&mut data, "calendar_name", calendar_name.clone());
            }
        }
        data
    }
}

fn data_insert(data: &mut TemplateData, key: &str, value: String) {
    data.insert(key.to_string(), value);
}

fn venue(location: &Option<String>, virtual_link: &Option<String>) -> String {
    location
        .clone()
        .or_else(|| virtual_link.clone())
        .unwrap_or_else(|| "Online".to_string())
}

fn format_ts(ts: i64) -> String {
    use chrono::TimeZone;
    match chrono::Utc.timestamp_millis_opt(ts).single() {
        Some(dt) => dt.to_rfc3339(),
        None => ts.to_string(),
    }
}

/// A recorded domain occurrence for one user. Created by the trigger
/// boundary and marked processed exactly once, after rule evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailEvent {
    pub id: ID,
    pub user_id: ID,
    pub payload: EmailEventPayload,
    pub timestamp: i64,
    pub processed: bool,
}

impl EmailEvent {
    pub fn new(user_id: &ID, payload: EmailEventPayload, timestamp: i64) -> Self {
        Self {
            id: Default::default(),
            user_id: user_id.clone(),
            payload,
            timestamp,
            processed: false,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.payload.event_type()
    }
}

impl Entity for EmailEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn goes_live_payload() -> EmailEventPayload {
        EmailEventPayload::EventGoesLive {
            event_id: Default::default(),
            event_name: "Rust Meetup".into(),
            start_ts: 1_700_000_000_000,
            location: None,
            virtual_link: Some("https://meet.example.com/rust".into()),
        }
    }

    #[test]
    fn payload_tag_is_the_event_type_name() {
        let json = serde_json::to_value(&goes_live_payload()).unwrap();
        assert_eq!(json["type"], "event_goes_live");

        let json = serde_json::to_value(&EmailEventPayload::EventInvitation {
            event_id: Default::default(),
            event_name: "Dinner".into(),
            host_name: "Ana".into(),
            start_ts: 0,
            location: Some("Oslo".into()),
            virtual_link: None,
        })
        .unwrap();
        assert_eq!(json["type"], "event_invitation");
    }

    #[test]
    fn field_accessor_resolves_typed_fields() {
        let payload = goes_live_payload();
        assert_eq!(
            payload.field("event_name"),
            Some(FieldValue::Text("Rust Meetup".into()))
        );
        assert_eq!(
            payload.field("start_ts"),
            Some(FieldValue::Int(1_700_000_000_000))
        );
        // Absent optional field and unknown field both resolve to nothing.
        assert_eq!(payload.field("location"), None);
        assert_eq!(payload.field("no_such_field"), None);
    }

    #[test]
    fn template_data_prefers_location_over_virtual_link() {
        let user = User::new("ana", "Ana Berg", 0);
        let payload = EmailEventPayload::EventGoesLive {
            event_id: Default::default(),
            event_name: "Rust Meetup".into(),
            start_ts: 1_700_000_000_000,
            location: Some("Oslo".into()),
            virtual_link: Some("https://meet.example.com/rust".into()),
        };
        let data = payload.template_data(&user);
        assert_eq!(data.get("venue"), Some(&"Oslo".to_string()));
        assert_eq!(data.get("user_name"), Some(&"Ana Berg".to_string()));

        let data = goes_live_payload().template_data(&user);
        assert_eq!(
            data.get("venue"),
            Some(&"https://meet.example.com/rust".to_string())
        );
    }
}
