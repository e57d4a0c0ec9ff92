use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::schedule_batch::*;
use mingle_notify_domain::{EmailBatch, EmailBatchStatus, ID};
use mingle_notify_infra::MingleContext;

pub async fn schedule_batch_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = ScheduleBatchUseCase {
        batch_id: path_params.batch_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|batch| HttpResponse::Ok().json(APIResponse::new(batch)))
        .map_err(MingleError::from)
}

/// Moves a draft batch to `scheduled`, re-checking that the template still
/// exists before the batch becomes eligible for processing.
#[derive(Debug)]
pub struct ScheduleBatchUseCase {
    pub batch_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    TemplateNotFound(ID),
    NotADraft(EmailBatchStatus),
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
            UseCaseError::NotADraft(status) => Self::Conflict(format!(
                "The batch cannot be scheduled from the status: {}.",
                status
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleBatchUseCase {
    type Response = EmailBatch;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleBatch";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let mut batch = ctx
            .repos
            .email_batches
            .find(&self.batch_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.batch_id.clone()))?;

        if batch.status != EmailBatchStatus::Draft {
            return Err(UseCaseError::NotADraft(batch.status));
        }
        if ctx
            .repos
            .email_templates
            .find(&batch.template_id)
            .await
            .is_none()
        {
            return Err(UseCaseError::TemplateNotFound(batch.template_id.clone()));
        }

        batch.status = EmailBatchStatus::Scheduled;
        ctx.repos
            .email_batches
            .save(&batch)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(batch)
    }
}
