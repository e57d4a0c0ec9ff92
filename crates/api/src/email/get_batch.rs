use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::get_batch::*;
use mingle_notify_domain::{EmailBatch, ID};
use mingle_notify_infra::MingleContext;

pub async fn get_batch_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = GetBatchUseCase {
        batch_id: path_params.batch_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|batch| HttpResponse::Ok().json(APIResponse::new(batch)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct GetBatchUseCase {
    pub batch_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(batch_id) => Self::NotFound(format!(
                "The email batch with id: {}, was not found.",
                batch_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetBatchUseCase {
    type Response = EmailBatch;

    type Error = UseCaseError;

    const NAME: &'static str = "GetBatch";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .email_batches
            .find(&self.batch_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.batch_id.clone()))
    }
}
