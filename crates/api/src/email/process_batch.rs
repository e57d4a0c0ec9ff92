use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::process_batch::*;
use mingle_notify_domain::{EmailBatch, EmailBatchStatus, TemplateData, ID};
use mingle_notify_infra::MingleContext;
use tracing::{info, warn};

pub async fn process_batch_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = ProcessBatchUseCase {
        batch_id: path_params.batch_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|batch| HttpResponse::Ok().json(APIResponse::new(batch)))
        .map_err(MingleError::from)
}

/// Renders and delivers a scheduled batch to every recipient. Recipients
/// without an email address are skipped and count in neither `sent_emails`
/// nor `failed_emails`.
#[derive(Debug)]
pub struct ProcessBatchUseCase {
    pub batch_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    TemplateNotFound(ID),
    NotScheduled(EmailBatchStatus),
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(batch_id) => Self::NotFound(format!(
                "The email batch with id: {}, was not found.",
                batch_id
            )),
            UseCaseError::TemplateNotFound(template_id) => Self::NotFound(format!(
                "The email template with id: {}, was not found.",
                template_id
            )),
            UseCaseError::NotScheduled(status) => Self::Conflict(format!(
                "The batch cannot be processed from the status: {}.",
                status
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessBatchUseCase {
    type Response = EmailBatch;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessBatch";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let mut batch = ctx
            .repos
            .email_batches
            .find(&self.batch_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.batch_id.clone()))?;

        if batch.status != EmailBatchStatus::Scheduled {
            return Err(UseCaseError::NotScheduled(batch.status));
        }
        let template = ctx
            .repos
            .email_templates
            .find(&batch.template_id)
            .await
            .ok_or_else(|| UseCaseError::TemplateNotFound(batch.template_id.clone()))?;

        batch.status = EmailBatchStatus::Processing;
        ctx.repos
            .email_batches
            .save(&batch)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        for user_id in batch.user_ids.clone() {
            let user = match ctx.repos.users.find(&user_id).await {
                Some(user) => user,
                None => {
                    warn!("Batch {}: user {} is gone, counting as failed", batch.id, user_id);
                    batch.record_failed();
                    continue;
                }
            };
            let recipient = match &user.email {
                Some(address) => address.clone(),
                // Not an error, the recipient simply has nowhere to
                // receive email.
                None => continue,
            };

            let mut data = TemplateData::new();
            data.insert("user_name".to_string(), user.full_name.clone());
            let rendered = match template.render(&data) {
                Ok(rendered) => rendered,
                Err(e) => {
                    warn!("Batch {}: cannot render for {}: {}", batch.id, user_id, e);
                    batch.record_failed();
                    continue;
                }
            };

            match ctx.mailer.deliver(&recipient, &rendered).await {
                Ok(()) => batch.record_sent(),
                Err(e) => {
                    warn!("Batch {}: delivery to {} failed: {}", batch.id, user_id, e);
                    batch.record_failed();
                }
            }
        }

        batch.status = EmailBatchStatus::Completed;
        ctx.repos
            .email_batches
            .save(&batch)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        info!(
            "Batch {} completed. sent: {}, failed: {}, total: {}",
            batch.id, batch.sent_emails, batch.failed_emails, batch.total_emails
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::email::create_batch::CreateBatchUseCase;
    use crate::email::schedule_batch::ScheduleBatchUseCase;
    use crate::email::test_helpers::insert_template;
    use mingle_notify_domain::{TemplateCategory, User};
    use mingle_notify_infra::{setup_context, InMemoryMailer};
    use std::sync::Arc;

    async fn setup() -> (MingleContext, Arc<InMemoryMailer>, ID) {
        let mut ctx = setup_context().await;
        let mailer = Arc::new(InMemoryMailer::new());
        ctx.mailer = mailer.clone();
        let template_id = insert_template(
            &ctx,
            "newsletter",
            TemplateCategory::Digest,
            "Hello {{user_name}}",
            vec!["user_name"],
        )
        .await;
        (ctx, mailer, template_id)
    }

    async fn insert_user(ctx: &MingleContext, username: &str, email: Option<&str>) -> User {
        let mut user = User::new(username, username, 0);
        user.email = email.map(|e| e.to_string());
        ctx.repos.users.insert(&user).await.unwrap();
        user
    }

    #[actix_web::test]
    async fn processes_scheduled_batch_through_completion() {
        let (ctx, mailer, template_id) = setup().await;
        let with_email = insert_user(&ctx, "ana", Some("ana@example.com")).await;
        let without_email = insert_user(&ctx, "bo", None).await;
        let gone = ID::default();

        let batch = execute(
            CreateBatchUseCase {
                template_id,
                user_ids: vec![with_email.id, without_email.id, gone],
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(batch.status, EmailBatchStatus::Draft);

        let batch = execute(
            ScheduleBatchUseCase {
                batch_id: batch.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(batch.status, EmailBatchStatus::Scheduled);

        let batch = execute(
            ProcessBatchUseCase {
                batch_id: batch.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(batch.status, EmailBatchStatus::Completed);
        assert_eq!(batch.sent_emails, 1);
        // The vanished user failed, the address-less one counts nowhere.
        assert_eq!(batch.failed_emails, 1);
        assert!(batch.sent_emails + batch.failed_emails <= batch.total_emails);
        assert_eq!(mailer.sent_count(), 1);
    }

    #[actix_web::test]
    async fn draft_batch_cannot_be_processed() {
        let (ctx, _, template_id) = setup().await;
        let user = insert_user(&ctx, "ana", Some("ana@example.com")).await;
        let batch = execute(
            CreateBatchUseCase {
                template_id,
                user_ids: vec![user.id],
            },
            &ctx,
        )
        .await
        .unwrap();

        let res = execute(
            ProcessBatchUseCase {
                batch_id: batch.id.clone(),
            },
            &ctx,
        )
        .await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::NotScheduled(EmailBatchStatus::Draft)
        );
    }
}
