use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::update_template::*;
use mingle_notify_domain::{EmailTemplate, ID};
use mingle_notify_infra::MingleContext;

pub async fn update_template_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = UpdateTemplateUseCase {
        template_id: path_params.template_id.clone(),
        subject: body.subject,
        html_body: body.html_body,
        text_body: body.text_body,
        variables: body.variables,
    };

    execute(usecase, &ctx)
        .await
        .map(|template| HttpResponse::Ok().json(APIResponse::new(template)))
        .map_err(MingleError::from)
}

/// Every successful update bumps the template version.
#[derive(Debug)]
pub struct UpdateTemplateUseCase {
    pub template_id: ID,
    pub subject: Option<String>,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub variables: Option<Vec<String>>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    UndeclaredPlaceholders(Vec<String>),
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(template_id) => Self::NotFound(format!(
                "The email template with id: {}, was not found.",
                template_id
            )),
            UseCaseError::UndeclaredPlaceholders(names) => Self::BadClientData(format!(
                "The template uses placeholders that are not declared as variables: {:?}",
                names
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateTemplateUseCase {
    type Response = EmailTemplate;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateTemplate";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let mut template = ctx
            .repos
            .email_templates
            .find(&self.template_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.template_id.clone()))?;

        if let Some(subject) = self.subject.take() {
            template.subject = subject;
        }
        if let Some(html_body) = self.html_body.take() {
            template.html_body = html_body;
        }
        if let Some(text_body) = self.text_body.take() {
            template.text_body = text_body;
        }
        if let Some(variables) = self.variables.take() {
            template.variables = variables;
        }

        let undeclared = template.undeclared_placeholders();
        if !undeclared.is_empty() {
            return Err(UseCaseError::UndeclaredPlaceholders(undeclared));
        }

        template.version += 1;
        ctx.repos
            .email_templates
            .save(&template)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(template)
    }
}
