use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::get_template::*;
use mingle_notify_domain::{EmailTemplate, ID};
use mingle_notify_infra::MingleContext;

pub async fn get_template_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = GetTemplateUseCase {
        template_id: path_params.template_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|template| HttpResponse::Ok().json(APIResponse::new(template)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct GetTemplateUseCase {
    pub template_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(template_id) => Self::NotFound(format!(
                "The email template with id: {}, was not found.",
                template_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTemplateUseCase {
    type Response = EmailTemplate;

    type Error = UseCaseError;

    const NAME: &'static str = "GetTemplate";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .email_templates
            .find(&self.template_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.template_id.clone()))
    }
}
