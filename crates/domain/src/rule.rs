use crate::email_event::{EmailEventPayload, EventType, FieldValue};
use crate::event::CalendarEvent;
use crate::shared::entity::{Entity, ID};
use crate::user::User;
use chrono::{Datelike, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Declarative mapping from an `EventType` plus conditions to a template and
/// a send delay. Rules are soft-disabled via `active`; `priority` only
/// orders processing, it never makes matches exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRule {
    pub id: ID,
    pub name: String,
    pub trigger: EventType,
    pub conditions: RuleConditions,
    pub delay_minutes: i64,
    pub template_id: ID,
    pub active: bool,
    pub priority: i64,
}

impl EmailRule {
    pub fn new(name: &str, trigger: EventType, template_id: &ID) -> Self {
        Self {
            id: Default::default(),
            name: name.to_string(),
            trigger,
            conditions: Default::default(),
            delay_minutes: 0,
            template_id: template_id.clone(),
            active: true,
            priority: 0,
        }
    }

    /// The full matching predicate: active, trigger match and conditions.
    pub fn matches(&self, input: &MatchInput) -> bool {
        self.active
            && self.trigger == input.payload.event_type()
            && self.conditions.satisfied_by(input)
    }
}

impl Entity for EmailRule {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventVisibility {
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Mon,
            chrono::Weekday::Tue => Self::Tue,
            chrono::Weekday::Wed => Self::Wed,
            chrono::Weekday::Thu => Self::Thu,
            chrono::Weekday::Fri => Self::Fri,
            chrono::Weekday::Sat => Self::Sat,
            chrono::Weekday::Sun => Self::Sun,
        }
    }
}

/// Trigger-time window in UTC hours. `from <= to` means `[from, to)`,
/// `from > to` wraps around midnight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HourWindow {
    pub from: u32,
    pub to: u32,
}

impl HourWindow {
    fn contains(&self, hour: u32) -> bool {
        if self.from <= self.to {
            hour >= self.from && hour < self.to
        } else {
            hour >= self.from || hour < self.to
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Equals,
    Contains,
    GreaterThan,
    LessThan,
    Exists,
}

/// One field/operator/value comparison against the event payload. `Exists`
/// takes no operand; every other operator requires one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: Option<FieldValue>,
}

impl FieldFilter {
    fn holds(&self, payload: &EmailEventPayload) -> bool {
        let actual = payload.field(&self.field);
        match self.op {
            FilterOp::Exists => actual.is_some(),
            FilterOp::Equals => match (&actual, &self.value) {
                (Some(actual), Some(expected)) => actual == expected,
                _ => false,
            },
            FilterOp::Contains => match (&actual, &self.value) {
                (Some(FieldValue::Text(actual)), Some(FieldValue::Text(needle))) => {
                    actual.contains(needle)
                }
                _ => false,
            },
            FilterOp::GreaterThan => match (&actual, &self.value) {
                (Some(FieldValue::Int(actual)), Some(FieldValue::Int(bound))) => actual > bound,
                _ => false,
            },
            FilterOp::LessThan => match (&actual, &self.value) {
                (Some(FieldValue::Int(actual)), Some(FieldValue::Int(bound))) => actual < bound,
                _ => false,
            },
        }
    }
}

/// Declarative conditions of an `EmailRule`. Every field is optional and all
/// present conditions must hold (AND semantics). The default value matches
/// every event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConditions {
    /// User must belong to at least one of these segments.
    pub segments: Option<Vec<String>>,
    /// Millisecond bounds on the user's signup date.
    pub joined_after: Option<i64>,
    pub joined_before: Option<i64>,
    /// Attributes of the referenced `CalendarEvent`. A condition that needs
    /// the event record fails when the payload does not reference one or the
    /// attribute is unknown.
    pub event_visibility: Option<EventVisibility>,
    pub min_capacity: Option<i64>,
    pub max_capacity: Option<i64>,
    /// Trigger-time windows, evaluated in UTC.
    pub hours: Option<HourWindow>,
    pub weekdays: Option<Vec<DayOfWeek>>,
    /// Generic comparisons against the typed payload fields.
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
}

/// Everything the condition interpreter is allowed to look at. Assembled by
/// the caller so the interpreter itself stays pure.
#[derive(Debug)]
pub struct MatchInput<'a> {
    pub payload: &'a EmailEventPayload,
    pub user: &'a User,
    /// The stored event the payload refers to, resolved by the caller when
    /// present. `None` either because the payload has no event reference or
    /// because the record is gone.
    pub calendar_event: Option<&'a CalendarEvent>,
    /// Trigger timestamp in milliseconds.
    pub now: i64,
}

impl RuleConditions {
    pub fn satisfied_by(&self, input: &MatchInput) -> bool {
        if let Some(segments) = &self.segments {
            if !segments.iter().any(|s| input.user.in_segment(s)) {
                return false;
            }
        }
        if let Some(after) = self.joined_after {
            if input.user.joined_at < after {
                return false;
            }
        }
        if let Some(before) = self.joined_before {
            if input.user.joined_at > before {
                return false;
            }
        }

        if let Some(visibility) = self.event_visibility {
            match input.calendar_event {
                Some(event) => {
                    let actual = if event.is_public {
                        EventVisibility::Public
                    } else {
                        EventVisibility::Private
                    };
                    if actual != visibility {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if self.min_capacity.is_some() || self.max_capacity.is_some() {
            let capacity = match input.calendar_event.and_then(|e| e.capacity) {
                Some(capacity) => capacity,
                // Unknown or uncapped events cannot satisfy a capacity range.
                None => return false,
            };
            if let Some(min) = self.min_capacity {
                if capacity < min {
                    return false;
                }
            }
            if let Some(max) = self.max_capacity {
                if capacity > max {
                    return false;
                }
            }
        }

        if self.hours.is_some() || self.weekdays.is_some() {
            let now = match Utc.timestamp_millis_opt(input.now).single() {
                Some(now) => now,
                None => return false,
            };
            if let Some(window) = &self.hours {
                if !window.contains(now.hour()) {
                    return false;
                }
            }
            if let Some(weekdays) = &self.weekdays {
                if !weekdays.contains(&DayOfWeek::from_chrono(now.weekday())) {
                    return false;
                }
            }
        }

        self.filters.iter().all(|f| f.holds(input.payload))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Wed Nov 15 2023 10:13:20 UTC
    const NOW: i64 = 1_700_043_200_000;

    fn payload() -> EmailEventPayload {
        EmailEventPayload::EventGoesLive {
            event_id: Default::default(),
            event_name: "Rust Meetup".into(),
            start_ts: NOW + 3_600_000,
            location: Some("Oslo".into()),
            virtual_link: None,
        }
    }

    fn user() -> User {
        let mut user = User::new("ana", "Ana Berg", NOW - 1_000_000);
        user.segments = vec!["hosts".into()];
        user
    }

    fn calendar_event(is_public: bool, capacity: Option<i64>) -> CalendarEvent {
        CalendarEvent {
            id: Default::default(),
            calendar_id: Default::default(),
            host_user_id: Default::default(),
            name: "Rust Meetup".into(),
            start_ts: NOW + 3_600_000,
            end_ts: NOW + 7_200_000,
            location: Some("Oslo".into()),
            virtual_link: None,
            is_public,
            capacity,
            created: NOW,
            updated: NOW,
        }
    }

    fn input<'a>(
        payload: &'a EmailEventPayload,
        user: &'a User,
        event: Option<&'a CalendarEvent>,
    ) -> MatchInput<'a> {
        MatchInput {
            payload,
            user,
            calendar_event: event,
            now: NOW,
        }
    }

    #[test]
    fn default_conditions_match_everything() {
        let payload = payload();
        let user = user();
        assert!(RuleConditions::default().satisfied_by(&input(&payload, &user, None)));
    }

    #[test]
    fn segment_condition() {
        let payload = payload();
        let user = user();
        let conditions = RuleConditions {
            segments: Some(vec!["hosts".into(), "beta".into()]),
            ..Default::default()
        };
        assert!(conditions.satisfied_by(&input(&payload, &user, None)));

        let conditions = RuleConditions {
            segments: Some(vec!["beta".into()]),
            ..Default::default()
        };
        assert!(!conditions.satisfied_by(&input(&payload, &user, None)));
    }

    #[test]
    fn join_date_bounds() {
        let payload = payload();
        let user = user();
        let conditions = RuleConditions {
            joined_after: Some(user.joined_at - 1),
            joined_before: Some(user.joined_at + 1),
            ..Default::default()
        };
        assert!(conditions.satisfied_by(&input(&payload, &user, None)));

        let conditions = RuleConditions {
            joined_after: Some(user.joined_at + 1),
            ..Default::default()
        };
        assert!(!conditions.satisfied_by(&input(&payload, &user, None)));

        let conditions = RuleConditions {
            joined_before: Some(user.joined_at - 1),
            ..Default::default()
        };
        assert!(!conditions.satisfied_by(&input(&payload, &user, None)));
    }

    #[test]
    fn visibility_condition_needs_the_event_record() {
        let payload = payload();
        let user = user();
        let conditions = RuleConditions {
            event_visibility: Some(EventVisibility::Public),
            ..Default::default()
        };

        let public = calendar_event(true, None);
        assert!(conditions.satisfied_by(&input(&payload, &user, Some(&public))));

        let private = calendar_event(false, None);
        assert!(!conditions.satisfied_by(&input(&payload, &user, Some(&private))));

        // No record resolved: the condition cannot hold.
        assert!(!conditions.satisfied_by(&input(&payload, &user, None)));
    }

    #[test]
    fn capacity_range_condition() {
        let payload = payload();
        let user = user();
        let conditions = RuleConditions {
            min_capacity: Some(10),
            max_capacity: Some(100),
            ..Default::default()
        };

        let within = calendar_event(true, Some(50));
        assert!(conditions.satisfied_by(&input(&payload, &user, Some(&within))));

        let below = calendar_event(true, Some(5));
        assert!(!conditions.satisfied_by(&input(&payload, &user, Some(&below))));

        let uncapped = calendar_event(true, None);
        assert!(!conditions.satisfied_by(&input(&payload, &user, Some(&uncapped))));
    }

    #[test]
    fn hour_window_condition() {
        let payload = payload();
        let user = user();
        // NOW is at 10:13 UTC.
        let conditions = RuleConditions {
            hours: Some(HourWindow { from: 9, to: 12 }),
            ..Default::default()
        };
        assert!(conditions.satisfied_by(&input(&payload, &user, None)));

        let conditions = RuleConditions {
            hours: Some(HourWindow { from: 12, to: 18 }),
            ..Default::default()
        };
        assert!(!conditions.satisfied_by(&input(&payload, &user, None)));

        // Wrap-around window covering 22:00-11:00.
        let conditions = RuleConditions {
            hours: Some(HourWindow { from: 22, to: 11 }),
            ..Default::default()
        };
        assert!(conditions.satisfied_by(&input(&payload, &user, None)));
    }

    #[test]
    fn weekday_condition() {
        let payload = payload();
        let user = user();
        // NOW is a Wednesday.
        let conditions = RuleConditions {
            weekdays: Some(vec![DayOfWeek::Mon, DayOfWeek::Wed]),
            ..Default::default()
        };
        assert!(conditions.satisfied_by(&input(&payload, &user, None)));

        let conditions = RuleConditions {
            weekdays: Some(vec![DayOfWeek::Sat, DayOfWeek::Sun]),
            ..Default::default()
        };
        assert!(!conditions.satisfied_by(&input(&payload, &user, None)));
    }

    #[test]
    fn field_filters() {
        let payload = payload();
        let user = user();
        let filter = |field: &str, op: FilterOp, value: Option<FieldValue>| RuleConditions {
            filters: vec![FieldFilter {
                field: field.into(),
                op,
                value,
            }],
            ..Default::default()
        };

        let cases = vec![
            (
                filter(
                    "event_name",
                    FilterOp::Equals,
                    Some(FieldValue::Text("Rust Meetup".into())),
                ),
                true,
            ),
            (
                filter(
                    "event_name",
                    FilterOp::Contains,
                    Some(FieldValue::Text("Meetup".into())),
                ),
                true,
            ),
            (
                filter(
                    "event_name",
                    FilterOp::Contains,
                    Some(FieldValue::Text("Gala".into())),
                ),
                false,
            ),
            (
                filter("start_ts", FilterOp::GreaterThan, Some(FieldValue::Int(NOW))),
                true,
            ),
            (
                filter("start_ts", FilterOp::LessThan, Some(FieldValue::Int(NOW))),
                false,
            ),
            (filter("location", FilterOp::Exists, None), true),
            (filter("virtual_link", FilterOp::Exists, None), false),
            // Type mismatch never holds.
            (
                filter(
                    "start_ts",
                    FilterOp::Contains,
                    Some(FieldValue::Text("17".into())),
                ),
                false,
            ),
        ];

        for (conditions, expected) in cases {
            assert_eq!(
                conditions.satisfied_by(&input(&payload, &user, None)),
                expected,
                "conditions: {:?}",
                conditions.filters
            );
        }
    }

    #[test]
    fn rule_matches_requires_active_and_trigger() {
        let payload = payload();
        let user = user();
        let mut rule = EmailRule::new("goes-live", EventType::EventGoesLive, &Default::default());
        assert!(rule.matches(&input(&payload, &user, None)));

        rule.active = false;
        assert!(!rule.matches(&input(&payload, &user, None)));

        rule.active = true;
        rule.trigger = EventType::EventInvitation;
        assert!(!rule.matches(&input(&payload, &user, None)));
    }
}
