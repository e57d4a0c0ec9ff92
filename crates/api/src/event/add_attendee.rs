use super::subscribers::SendInvitationOnAttendeeAdded;
use crate::error::MingleError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::add_attendee::*;
use mingle_notify_domain::{Attendee, CalendarEvent, ID};
use mingle_notify_infra::MingleContext;

pub async fn add_attendee_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = AddAttendeeUseCase {
        event_id: path_params.event_id.clone(),
        user_id: body.0.user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.attendee)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct AddAttendeeUseCase {
    pub event_id: ID,
    pub user_id: ID,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub attendee: Attendee,
    pub event: CalendarEvent,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    UserNotFound(ID),
    AlreadyAttending,
    CapacityReached,
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::AlreadyAttending => {
                Self::Conflict("The user is already on the guest list.".into())
            }
            UseCaseError::CapacityReached => {
                Self::Conflict("The event has reached its capacity.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for AddAttendeeUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "AddAttendee";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;
        let user = ctx
            .repos
            .users
            .find(&self.user_id)
            .await
            .ok_or_else(|| UseCaseError::UserNotFound(self.user_id.clone()))?;

        if ctx
            .repos
            .attendees
            .find_by_event_and_user(&event.id, &user.id)
            .await
            .is_some()
        {
            return Err(UseCaseError::AlreadyAttending);
        }
        if let Some(capacity) = event.capacity {
            let guests = ctx.repos.attendees.find_by_event(&event.id).await;
            if guests.len() as i64 >= capacity {
                return Err(UseCaseError::CapacityReached);
            }
        }

        let attendee = Attendee::new(&event.id, &user.id);
        ctx.repos
            .attendees
            .insert(&attendee)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes { attendee, event })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendInvitationOnAttendeeAdded)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mingle_notify_domain::{Calendar, User};
    use mingle_notify_infra::setup_context;

    async fn setup() -> (MingleContext, CalendarEvent) {
        let ctx = setup_context().await;
        let host = User::new("ana", "Ana Berg", 0);
        ctx.repos.users.insert(&host).await.unwrap();
        let calendar = Calendar::new(&host.id, "Meetups");
        ctx.repos.calendars.insert(&calendar).await.unwrap();
        let event = CalendarEvent {
            id: Default::default(),
            calendar_id: calendar.id.clone(),
            host_user_id: host.id.clone(),
            name: "Rust Meetup".into(),
            start_ts: 1000,
            end_ts: 2000,
            location: None,
            virtual_link: None,
            is_public: true,
            capacity: Some(1),
            created: 0,
            updated: 0,
        };
        ctx.repos.events.insert(&event).await.unwrap();
        (ctx, event)
    }

    #[actix_web::test]
    async fn adds_attendee_until_capacity_is_reached() {
        let (ctx, event) = setup().await;
        let guest1 = User::new("bo", "Bo Lindqvist", 0);
        let guest2 = User::new("eva", "Eva Holm", 0);
        ctx.repos.users.insert(&guest1).await.unwrap();
        ctx.repos.users.insert(&guest2).await.unwrap();

        let res = execute(
            AddAttendeeUseCase {
                event_id: event.id.clone(),
                user_id: guest1.id.clone(),
            },
            &ctx,
        )
        .await;
        assert!(res.is_ok());

        let res = execute(
            AddAttendeeUseCase {
                event_id: event.id.clone(),
                user_id: guest2.id.clone(),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::CapacityReached);
    }

    #[actix_web::test]
    async fn rejects_duplicate_attendee() {
        let (ctx, event) = setup().await;
        let guest = User::new("bo", "Bo Lindqvist", 0);
        ctx.repos.users.insert(&guest).await.unwrap();

        execute(
            AddAttendeeUseCase {
                event_id: event.id.clone(),
                user_id: guest.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();

        let res = execute(
            AddAttendeeUseCase {
                event_id: event.id.clone(),
                user_id: guest.id.clone(),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::AlreadyAttending);
    }
}
