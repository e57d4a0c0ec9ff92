use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::create_batch::*;
use mingle_notify_domain::{EmailBatch, ID};
use mingle_notify_infra::MingleContext;

pub async fn create_batch_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = CreateBatchUseCase {
        template_id: body.template_id,
        user_ids: body.user_ids,
    };

    execute(usecase, &ctx)
        .await
        .map(|batch| HttpResponse::Created().json(APIResponse::new(batch)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct CreateBatchUseCase {
    pub template_id: ID,
    pub user_ids: Vec<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TemplateNotFound(ID),
    EmptyRecipientList,
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TemplateNotFound(template_id) => Self::NotFound(format!(
                "The email template with id: {}, was not found.",
                template_id
            )),
            UseCaseError::EmptyRecipientList => {
                Self::BadClientData("A batch needs at least one recipient.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateBatchUseCase {
    type Response = EmailBatch;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateBatch";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        if self.user_ids.is_empty() {
            return Err(UseCaseError::EmptyRecipientList);
        }
        if ctx
            .repos
            .email_templates
            .find(&self.template_id)
            .await
            .is_none()
        {
            return Err(UseCaseError::TemplateNotFound(self.template_id.clone()));
        }

        let batch = EmailBatch::new(
            &self.template_id,
            self.user_ids.clone(),
            ctx.sys.get_timestamp_millis(),
        );
        ctx.repos
            .email_batches
            .insert(&batch)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(batch)
    }
}
