use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::get_scheduled_emails::*;
use mingle_notify_domain::{ScheduledEmail, ID};
use mingle_notify_infra::MingleContext;

pub async fn get_scheduled_emails_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = GetScheduledEmailsUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|emails| HttpResponse::Ok().json(APIResponse::new(emails)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct GetScheduledEmailsUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(ID),
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetScheduledEmailsUseCase {
    type Response = Vec<ScheduledEmail>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetScheduledEmails";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id.clone()));
        }
        Ok(ctx.repos.scheduled_emails.find_by_user(&self.user_id).await)
    }
}
