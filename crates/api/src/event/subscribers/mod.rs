use super::add_attendee::{AddAttendeeUseCase, UseCaseRes as AddAttendeeRes};
use super::create_event::CreateEventUseCase;
use super::rsvp_event::{RsvpEventUseCase, UseCaseRes as RsvpRes};
use super::schedule_goes_live::ScheduleGoesLiveNotificationsUseCase;
use crate::email::trigger_email_event::TriggerEmailEventUseCase;
use crate::shared::usecase::{execute, Subscriber};
use mingle_notify_domain::{CalendarEvent, EmailEventPayload};
use mingle_notify_infra::MingleContext;

pub struct ScheduleGoesLiveOnEventCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateEventUseCase> for ScheduleGoesLiveOnEventCreated {
    async fn notify(&self, e: &CalendarEvent, ctx: &MingleContext) {
        let schedule = ScheduleGoesLiveNotificationsUseCase {
            event_id: e.id.clone(),
        };

        // Sideeffect, ignore result
        let _ = execute(schedule, ctx).await;
    }
}

pub struct SendInvitationOnAttendeeAdded;

#[async_trait::async_trait(?Send)]
impl Subscriber<AddAttendeeUseCase> for SendInvitationOnAttendeeAdded {
    async fn notify(&self, e: &AddAttendeeRes, ctx: &MingleContext) {
        let host_name = match ctx.repos.users.find(&e.event.host_user_id).await {
            Some(host) => host.full_name,
            None => "The host".to_string(),
        };
        let trigger = TriggerEmailEventUseCase {
            user_id: e.attendee.user_id.clone(),
            payload: EmailEventPayload::EventInvitation {
                event_id: e.event.id.clone(),
                event_name: e.event.name.clone(),
                host_name,
                start_ts: e.event.start_ts,
                location: e.event.location.clone(),
                virtual_link: e.event.virtual_link.clone(),
            },
        };

        // Sideeffect, ignore result
        let _ = execute(trigger, ctx).await;
    }
}

pub struct ConfirmRsvpOnReply;

#[async_trait::async_trait(?Send)]
impl Subscriber<RsvpEventUseCase> for ConfirmRsvpOnReply {
    async fn notify(&self, e: &RsvpRes, ctx: &MingleContext) {
        let trigger = TriggerEmailEventUseCase {
            user_id: e.attendee.user_id.clone(),
            payload: EmailEventPayload::RsvpConfirmation {
                event_id: e.event.id.clone(),
                event_name: e.event.name.clone(),
                start_ts: e.event.start_ts,
                rsvp: e.attendee.rsvp,
            },
        };

        // Sideeffect, ignore result
        let _ = execute(trigger, ctx).await;
    }
}
