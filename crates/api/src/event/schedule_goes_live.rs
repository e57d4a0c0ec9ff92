use crate::error::MingleError;
use crate::job_schedulers::schedule_goes_live_dispatch;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::schedule_goes_live::{APIResponse, PathParams};
use mingle_notify_domain::ID;
use mingle_notify_infra::MingleContext;
use tracing::info;

pub async fn schedule_goes_live_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = ScheduleGoesLiveNotificationsUseCase {
        event_id: path_params.event_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                attendees: res.attendees,
                scheduled: res.scheduled,
            })
        })
        .map_err(MingleError::from)
}

/// Registers the one-shot deferred callback that announces an event at its
/// start time. Past events are never backfilled, so scheduling one is a
/// no-op. The returned attendee count reflects the guest list at schedule
/// time only; the dispatcher re-reads it when it fires.
#[derive(Debug)]
pub struct ScheduleGoesLiveNotificationsUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub struct UseCaseRes {
    pub attendees: usize,
    pub scheduled: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
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
impl UseCase for ScheduleGoesLiveNotificationsUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleGoesLiveNotifications";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;

        let attendees = ctx.repos.attendees.find_by_event(&event.id).await.len();

        let now = ctx.sys.get_timestamp_millis();
        if !event.starts_after(now) {
            info!(
                "Event {} already started, not scheduling goes-live notifications",
                event.id
            );
            return Ok(UseCaseRes {
                attendees,
                scheduled: false,
            });
        }

        schedule_goes_live_dispatch(ctx.clone(), event.id.clone(), event.start_ts);
        Ok(UseCaseRes {
            attendees,
            scheduled: true,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::email::test_helpers::TestSys;
    use mingle_notify_domain::{Attendee, Calendar, CalendarEvent, User};
    use mingle_notify_infra::setup_context;
    use std::sync::Arc;

    const NOW: i64 = 1_700_043_200_000;

    async fn setup(start_ts: i64) -> (MingleContext, CalendarEvent) {
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
            start_ts,
            end_ts: start_ts + 3_600_000,
            location: None,
            virtual_link: None,
            is_public: true,
            capacity: None,
            created: 0,
            updated: 0,
        };
        ctx.repos.events.insert(&event).await.unwrap();
        (ctx, event)
    }

    async fn add_guest(ctx: &MingleContext, event_id: &ID, username: &str, email: Option<&str>) {
        let mut user = User::new(username, username, 0);
        user.email = email.map(|e| e.to_string());
        ctx.repos.users.insert(&user).await.unwrap();
        let attendee = Attendee::new(event_id, &user.id);
        ctx.repos.attendees.insert(&attendee).await.unwrap();
    }

    #[actix_web::test]
    async fn schedules_future_event_and_counts_attendees() {
        let (ctx, event) = setup(NOW + 3_600_000).await;
        add_guest(&ctx, &event.id, "bo", Some("bo@example.com")).await;
        add_guest(&ctx, &event.id, "eva", None).await;

        let res = execute(
            ScheduleGoesLiveNotificationsUseCase {
                event_id: event.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(
            res,
            UseCaseRes {
                attendees: 2,
                scheduled: true
            }
        );
    }

    #[actix_web::test]
    async fn past_event_is_a_noop() {
        let (ctx, event) = setup(NOW - 1000).await;
        add_guest(&ctx, &event.id, "bo", Some("bo@example.com")).await;

        let res = execute(
            ScheduleGoesLiveNotificationsUseCase {
                event_id: event.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(
            res,
            UseCaseRes {
                attendees: 1,
                scheduled: false
            }
        );
    }

    #[actix_web::test]
    async fn unknown_event_is_rejected() {
        let (ctx, _) = setup(NOW + 1000).await;
        let event_id = ID::default();
        let res = execute(
            ScheduleGoesLiveNotificationsUseCase {
                event_id: event_id.clone(),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::EventNotFound(event_id));
    }
}
