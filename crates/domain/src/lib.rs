mod batch;
mod calendar;
mod email_event;
mod event;
mod rule;
mod scheduled_email;
mod shared;
mod template;
mod user;

pub use batch::{EmailBatch, EmailBatchStatus};
pub use calendar::Calendar;
pub use email_event::{EmailEvent, EmailEventPayload, EventType, FieldValue};
pub use event::{Attendee, CalendarEvent, RsvpStatus};
pub use rule::{
    DayOfWeek, EmailRule, EventVisibility, FieldFilter, FilterOp, HourWindow, MatchInput,
    RuleConditions,
};
pub use scheduled_email::{RetryPolicy, ScheduledEmail, ScheduledEmailStatus};
pub use shared::entity::{Entity, ID};
pub use template::{
    EmailTemplate, RenderError, RenderedEmail, TemplateCategory, TemplateData,
};
pub use user::User;
