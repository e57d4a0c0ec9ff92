use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::create_calendar::*;
use mingle_notify_domain::{Calendar, ID};
use mingle_notify_infra::MingleContext;

pub async fn create_calendar_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = CreateCalendarUseCase {
        owner_user_id: body.owner_user_id,
        name: body.name,
    };

    execute(usecase, &ctx)
        .await
        .map(|calendar| HttpResponse::Created().json(APIResponse::new(calendar)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct CreateCalendarUseCase {
    pub owner_user_id: ID,
    pub name: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateCalendarUseCase {
    type Response = Calendar;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateCalendar";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let owner = ctx
            .repos
            .users
            .find(&self.owner_user_id)
            .await
            .ok_or_else(|| UseCaseError::UserNotFound(self.owner_user_id.clone()))?;

        let calendar = Calendar::new(&owner.id, &self.name);
        ctx.repos
            .calendars
            .insert(&calendar)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(calendar)
    }
}
