use super::subscribers::ConfirmRsvpOnReply;
use crate::error::MingleError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::rsvp_event::*;
use mingle_notify_domain::{Attendee, CalendarEvent, RsvpStatus, ID};
use mingle_notify_infra::MingleContext;

pub async fn rsvp_event_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = RsvpEventUseCase {
        event_id: path_params.event_id.clone(),
        user_id: body.user_id,
        rsvp: body.rsvp,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.attendee)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct RsvpEventUseCase {
    pub event_id: ID,
    pub user_id: ID,
    pub rsvp: RsvpStatus,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub attendee: Attendee,
    pub event: CalendarEvent,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    NotAttending,
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::NotAttending => {
                Self::NotFound("The user is not on the guest list of the event.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RsvpEventUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "RsvpEvent";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;

        let mut attendee = ctx
            .repos
            .attendees
            .find_by_event_and_user(&event.id, &self.user_id)
            .await
            .ok_or(UseCaseError::NotAttending)?;

        attendee.rsvp = self.rsvp;
        ctx.repos
            .attendees
            .save(&attendee)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes { attendee, event })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ConfirmRsvpOnReply)]
    }
}
