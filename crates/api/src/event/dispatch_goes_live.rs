use crate::email::trigger_email_event::TriggerEmailEventUseCase;
use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use mingle_notify_domain::{EmailEventPayload, ID};
use mingle_notify_infra::MingleContext;
use tracing::warn;

/// Fire-time half of the goes-live flow. Re-fetches the event and its guest
/// list so changes made after scheduling are honored, then emits one
/// notification trigger per attendee with a known email address.
#[derive(Debug)]
pub struct DispatchGoesLiveUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub struct UseCaseRes {
    pub notified: usize,
    pub skipped: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    /// The event vanished between scheduling and firing. The dispatch is
    /// abandoned; the intended moment has passed, there is nothing to retry.
    EventNotFound(ID),
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchGoesLiveUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchGoesLive";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;

        let attendees = ctx.repos.attendees.find_by_event(&event.id).await;
        let mut res = UseCaseRes {
            notified: 0,
            skipped: 0,
        };

        for attendee in attendees {
            let user = match ctx.repos.users.find(&attendee.user_id).await {
                Some(user) => user,
                None => {
                    res.skipped += 1;
                    continue;
                }
            };
            // Missing address is not an error, the guest simply cannot be
            // reached by email.
            if user.email.is_none() {
                res.skipped += 1;
                continue;
            }

            let trigger = TriggerEmailEventUseCase {
                user_id: user.id.clone(),
                payload: EmailEventPayload::EventGoesLive {
                    event_id: event.id.clone(),
                    event_name: event.name.clone(),
                    start_ts: event.start_ts,
                    location: event.location.clone(),
                    virtual_link: event.virtual_link.clone(),
                },
            };
            match execute(trigger, ctx).await {
                Ok(_) => res.notified += 1,
                Err(e) => {
                    warn!(
                        "Goes-live trigger for user {} on event {} failed: {:?}",
                        user.id, event.id, e
                    );
                    res.skipped += 1;
                }
            }
        }

        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::email::test_helpers::{insert_template, TestSys};
    use mingle_notify_domain::{
        Attendee, Calendar, CalendarEvent, EmailRule, EventType, TemplateCategory, User,
    };
    use mingle_notify_infra::setup_context;
    use std::sync::Arc;

    const NOW: i64 = 1_700_043_200_000;

    async fn setup() -> (MingleContext, CalendarEvent) {
        let mut ctx = setup_context().await;
        ctx.sys = Arc::new(TestSys(NOW));
        let host = User::new("ana", "Ana Berg", 0);
        ctx.repos.users.insert(&host).await.unwrap();
        let calendar = Calendar::new(&host.id, "Meetups");
        ctx.repos.calendars.insert(&calendar).await.unwrap();
        let event = CalendarEvent {
            id: Default::default(),
            calendar_id: calendar.id.clone(),
            host_user_id: host.id.clone(),
            name: "Rust Meetup".into(),
            start_ts: NOW,
            end_ts: NOW + 3_600_000,
            location: Some("Oslo".into()),
            virtual_link: None,
            is_public: true,
            capacity: None,
            created: 0,
            updated: 0,
        };
        ctx.repos.events.insert(&event).await.unwrap();

        // An immediate goes-live rule so triggered events materialize
        // scheduled emails.
        let template_id = insert_template(
            &ctx,
            "goes-live",
            TemplateCategory::Transactional,
            "{{event_name}} is live",
            vec!["event_name", "user_name"],
        )
        .await;
        let rule = EmailRule::new("goes-live", EventType::EventGoesLive, &template_id);
        ctx.repos.email_rules.insert(&rule).await.unwrap();

        (ctx, event)
    }

    async fn add_guest(
        ctx: &MingleContext,
        event_id: &ID,
        username: &str,
        email: Option<&str>,
    ) -> User {
        let mut user = User::new(username, username, 0);
        user.email = email.map(|e| e.to_string());
        ctx.repos.users.insert(&user).await.unwrap();
        let attendee = Attendee::new(event_id, &user.id);
        ctx.repos.attendees.insert(&attendee).await.unwrap();
        user
    }

    #[actix_web::test]
    async fn notifies_only_attendees_with_an_address() {
        let (ctx, event) = setup().await;
        let reachable = add_guest(&ctx, &event.id, "bo", Some("bo@example.com")).await;
        add_guest(&ctx, &event.id, "eva", None).await;

        let res = execute(
            DispatchGoesLiveUseCase {
                event_id: event.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(
            res,
            UseCaseRes {
                notified: 1,
                skipped: 1
            }
        );

        // Exactly one trigger call went through the engine.
        let scheduled = ctx
            .repos
            .scheduled_emails
            .find_by_user(&reachable.id)
            .await;
        assert_eq!(scheduled.len(), 1);
    }

    #[actix_web::test]
    async fn vanished_event_abandons_the_dispatch() {
        let (ctx, _) = setup().await;
        let event_id = ID::default();
        let res = execute(
            DispatchGoesLiveUseCase {
                event_id: event_id.clone(),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::EventNotFound(event_id));
    }
}
