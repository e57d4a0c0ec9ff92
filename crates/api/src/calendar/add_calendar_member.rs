use crate::email::trigger_email_event::TriggerEmailEventUseCase;
use crate::error::MingleError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::add_calendar_member::*;
use mingle_notify_domain::{Calendar, EmailEventPayload, ID};
use mingle_notify_infra::MingleContext;

pub async fn add_calendar_member_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = AddCalendarMemberUseCase {
        calendar_id: path_params.calendar_id.clone(),
        user_id: body.0.user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.calendar)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct AddCalendarMemberUseCase {
    pub calendar_id: ID,
    pub user_id: ID,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub calendar: Calendar,
    pub member_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    CalendarNotFound(ID),
    UserNotFound(ID),
    AlreadyMember,
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::CalendarNotFound(calendar_id) => Self::NotFound(format!(
                "The calendar with id: {}, was not found.",
                calendar_id
            )),
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::AlreadyMember => {
                Self::Conflict("The user is already a member of the calendar.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for AddCalendarMemberUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "AddCalendarMember";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let mut calendar = ctx
            .repos
            .calendars
            .find(&self.calendar_id)
            .await
            .ok_or_else(|| UseCaseError::CalendarNotFound(self.calendar_id.clone()))?;

        let user = ctx
            .repos
            .users
            .find(&self.user_id)
            .await
            .ok_or_else(|| UseCaseError::UserNotFound(self.user_id.clone()))?;

        if calendar.is_member(&user.id) {
            return Err(UseCaseError::AlreadyMember);
        }

        calendar.members.push(user.id.clone());
        ctx.repos
            .calendars
            .save(&calendar)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes {
            calendar,
            member_id: user.id,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(WelcomeMemberOnCalendarJoined)]
    }
}

pub struct WelcomeMemberOnCalendarJoined;

#[async_trait::async_trait(?Send)]
impl Subscriber<AddCalendarMemberUseCase> for WelcomeMemberOnCalendarJoined {
    async fn notify(&self, e: &UseCaseRes, ctx: &MingleContext) {
        let trigger = TriggerEmailEventUseCase {
            user_id: e.member_id.clone(),
            payload: EmailEventPayload::CalendarMemberJoined {
                calendar_id: e.calendar.id.clone(),
                calendar_name: e.calendar.name.clone(),
            },
        };

        // Sideeffect, ignore result
        let _ = execute(trigger, ctx).await;
    }
}
