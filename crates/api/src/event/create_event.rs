use super::subscribers::ScheduleGoesLiveOnEventCreated;
use crate::error::MingleError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::create_event::*;
use mingle_notify_domain::{CalendarEvent, ID};
use mingle_notify_infra::MingleContext;

pub async fn create_event_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = CreateEventUseCase {
        calendar_id: body.calendar_id,
        host_user_id: body.host_user_id,
        name: body.name,
        start_ts: body.start_ts,
        end_ts: body.end_ts,
        location: body.location,
        virtual_link: body.virtual_link,
        is_public: body.is_public.unwrap_or(true),
        capacity: body.capacity,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
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

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    CalendarNotFound(ID),
    HostNotFound(ID),
    InvalidTimespan,
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::CalendarNotFound(calendar_id) => Self::NotFound(format!(
                "The calendar with id: {}, was not found.",
                calendar_id
            )),
            UseCaseError::HostNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::InvalidTimespan => {
                Self::BadClientData("The event has to end after it starts.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = CalendarEvent;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        if self.end_ts <= self.start_ts {
            return Err(UseCaseError::InvalidTimespan);
        }
        let calendar = ctx
            .repos
            .calendars
            .find(&self.calendar_id)
            .await
            .ok_or_else(|| UseCaseError::CalendarNotFound(self.calendar_id.clone()))?;
        let host = ctx
            .repos
            .users
            .find(&self.host_user_id)
            .await
            .ok_or_else(|| UseCaseError::HostNotFound(self.host_user_id.clone()))?;

        let now = ctx.sys.get_timestamp_millis();
        let event = CalendarEvent {
            id: Default::default(),
            calendar_id: calendar.id.clone(),
            host_user_id: host.id.clone(),
            name: self.name.clone(),
            start_ts: self.start_ts,
            end_ts: self.end_ts,
            location: self.location.clone(),
            virtual_link: self.virtual_link.clone(),
            is_public: self.is_public,
            capacity: self.capacity,
            created: now,
            updated: now,
        };

        ctx.repos
            .events
            .insert(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(event)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleGoesLiveOnEventCreated)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mingle_notify_domain::{Calendar, User};
    use mingle_notify_infra::setup_context;

    struct TestContext {
        ctx: MingleContext,
        calendar: Calendar,
        host: User,
    }

    async fn setup() -> TestContext {
        let ctx = setup_context().await;
        let host = User::new("ana", "Ana Berg", 0);
        ctx.repos.users.insert(&host).await.unwrap();
        let calendar = Calendar::new(&host.id, "Meetups");
        ctx.repos.calendars.insert(&calendar).await.unwrap();

        TestContext {
            ctx,
            calendar,
            host,
        }
    }

    #[actix_web::test]
    async fn creates_event() {
        let TestContext {
            ctx,
            calendar,
            host,
        } = setup().await;

        let usecase = CreateEventUseCase {
            calendar_id: calendar.id.clone(),
            host_user_id: host.id.clone(),
            name: "Rust Meetup".into(),
            start_ts: 500,
            end_ts: 1300,
            location: None,
            virtual_link: None,
            is_public: true,
            capacity: None,
        };

        let res = execute(usecase, &ctx).await;
        assert!(res.is_ok());
    }

    #[actix_web::test]
    async fn rejects_invalid_calendar_id() {
        let TestContext { ctx, host, .. } = setup().await;

        let calendar_id = ID::default();
        let usecase = CreateEventUseCase {
            calendar_id: calendar_id.clone(),
            host_user_id: host.id.clone(),
            name: "Rust Meetup".into(),
            start_ts: 500,
            end_ts: 1300,
            location: None,
            virtual_link: None,
            is_public: true,
            capacity: None,
        };

        let res = execute(usecase, &ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::CalendarNotFound(calendar_id)
        );
    }

    #[actix_web::test]
    async fn rejects_backwards_timespan() {
        let TestContext {
            ctx,
            calendar,
            host,
        } = setup().await;

        let usecase = CreateEventUseCase {
            calendar_id: calendar.id.clone(),
            host_user_id: host.id.clone(),
            name: "Rust Meetup".into(),
            start_ts: 1300,
            end_ts: 500,
            location: None,
            virtual_link: None,
            is_public: true,
            capacity: None,
        };

        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidTimespan);
    }
}
