use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::cancel_scheduled_email::*;
use mingle_notify_domain::{ScheduledEmail, ScheduledEmailStatus, ID};
use mingle_notify_infra::MingleContext;

pub async fn cancel_scheduled_email_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = CancelScheduledEmailUseCase {
        scheduled_email_id: path_params.scheduled_email_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|email| HttpResponse::Ok().json(APIResponse::new(email)))
        .map_err(MingleError::from)
}

/// Cancellation is honored only while the record is still pending. Once a
/// dispatcher claimed it the send is let to finish, and terminal records
/// stay what they are.
#[derive(Debug)]
pub struct CancelScheduledEmailUseCase {
    pub scheduled_email_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    AlreadyProcessing,
    AlreadyTerminal(ScheduledEmailStatus),
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => Self::NotFound(format!(
                "The scheduled email with id: {}, was not found.",
                id
            )),
            UseCaseError::AlreadyProcessing => {
                Self::Conflict("The scheduled email is being delivered right now.".into())
            }
            UseCaseError::AlreadyTerminal(status) => Self::Conflict(format!(
                "The scheduled email already reached the terminal status: {}.",
                status
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelScheduledEmailUseCase {
    type Response = ScheduledEmail;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelScheduledEmail";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let mut email = ctx
            .repos
            .scheduled_emails
            .find(&self.scheduled_email_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.scheduled_email_id.clone()))?;

        match email.status {
            ScheduledEmailStatus::Pending => {
                email.status = ScheduledEmailStatus::Cancelled;
                ctx.repos
                    .scheduled_emails
                    .save(&email)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                Ok(email)
            }
            ScheduledEmailStatus::Processing => Err(UseCaseError::AlreadyProcessing),
            status => Err(UseCaseError::AlreadyTerminal(status)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::email::test_helpers::{insert_scheduled_email, insert_template, TestSys};
    use mingle_notify_domain::{TemplateCategory, User};
    use mingle_notify_infra::setup_context;
    use std::sync::Arc;

    const NOW: i64 = 1_700_043_200_000;

    async fn setup() -> (MingleContext, ScheduledEmail) {
        let mut ctx = setup_context().await;
        ctx.sys = Arc::new(TestSys(NOW));
        let user = User::new("ana", "Ana Berg", 0);
        ctx.repos.users.insert(&user).await.unwrap();
        let template_id = insert_template(
            &ctx,
            "goes-live",
            TemplateCategory::Transactional,
            "{{event_name}}",
            vec!["event_name"],
        )
        .await;
        let email = insert_scheduled_email(&ctx, &user.id, &template_id, NOW + 60_000, 3).await;
        (ctx, email)
    }

    #[actix_web::test]
    async fn cancels_pending_email() {
        let (ctx, email) = setup().await;
        let usecase = CancelScheduledEmailUseCase {
            scheduled_email_id: email.id.clone(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.status, ScheduledEmailStatus::Cancelled);

        let stored = ctx.repos.scheduled_emails.find(&email.id).await.unwrap();
        assert_eq!(stored.status, ScheduledEmailStatus::Cancelled);
    }

    #[actix_web::test]
    async fn processing_email_is_let_to_finish() {
        let (ctx, mut email) = setup().await;
        email.status = ScheduledEmailStatus::Processing;
        ctx.repos.scheduled_emails.save(&email).await.unwrap();

        let usecase = CancelScheduledEmailUseCase {
            scheduled_email_id: email.id.clone(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::AlreadyProcessing);
    }

    #[actix_web::test]
    async fn terminal_email_stays_terminal() {
        let (ctx, mut email) = setup().await;
        email.mark_sent(NOW);
        ctx.repos.scheduled_emails.save(&email).await.unwrap();

        let usecase = CancelScheduledEmailUseCase {
            scheduled_email_id: email.id.clone(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::AlreadyTerminal(ScheduledEmailStatus::Sent)
        );
    }
}
