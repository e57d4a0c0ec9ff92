use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::get_rules::*;
use mingle_notify_domain::EmailRule;
use mingle_notify_infra::MingleContext;

pub async fn get_rules_controller(
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = GetRulesUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|rules| HttpResponse::Ok().json(APIResponse::new(rules)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct GetRulesUseCase {}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for MingleError {
    fn from(_: UseCaseError) -> Self {
        Self::InternalError
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRulesUseCase {
    type Response = Vec<EmailRule>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetRules";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.email_rules.all().await)
    }
}
