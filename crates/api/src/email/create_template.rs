use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::create_template::*;
use mingle_notify_domain::{EmailTemplate, TemplateCategory};
use mingle_notify_infra::MingleContext;

pub async fn create_template_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = CreateTemplateUseCase {
        name: body.name,
        category: body.category,
        subject: body.subject,
        html_body: body.html_body,
        text_body: body.text_body,
        variables: body.variables,
    };

    execute(usecase, &ctx)
        .await
        .map(|template| HttpResponse::Created().json(APIResponse::new(template)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct CreateTemplateUseCase {
    pub name: String,
    pub category: TemplateCategory,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub variables: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    /// The bodies reference placeholders the `variables` list does not
    /// declare, so no payload could ever satisfy the template.
    UndeclaredPlaceholders(Vec<String>),
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UndeclaredPlaceholders(names) => Self::BadClientData(format!(
                "The template uses placeholders that are not declared as variables: {:?}",
                names
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateTemplateUseCase {
    type Response = EmailTemplate;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateTemplate";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let mut template = EmailTemplate::new(&self.name, self.category);
        template.subject = self.subject.clone();
        template.html_body = self.html_body.clone();
        template.text_body = self.text_body.clone();
        template.variables = self.variables.clone();

        let undeclared = template.undeclared_placeholders();
        if !undeclared.is_empty() {
            return Err(UseCaseError::UndeclaredPlaceholders(undeclared));
        }

        ctx.repos
            .email_templates
            .insert(&template)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(template)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mingle_notify_infra::setup_context;

    #[actix_web::test]
    async fn creates_template_at_version_one() {
        let ctx = setup_context().await;
        let usecase = CreateTemplateUseCase {
            name: "goes-live".into(),
            category: TemplateCategory::Transactional,
            subject: "{{event_name}} is live".into(),
            html_body: "<p>Hi {{user_name}}</p>".into(),
            text_body: "Hi {{user_name}}".into(),
            variables: vec!["event_name".into(), "user_name".into()],
        };
        let template = execute(usecase, &ctx).await.unwrap();
        assert_eq!(template.version, 1);
        assert!(ctx.repos.email_templates.find(&template.id).await.is_some());
    }

    #[actix_web::test]
    async fn rejects_undeclared_placeholders() {
        let ctx = setup_context().await;
        let usecase = CreateTemplateUseCase {
            name: "goes-live".into(),
            category: TemplateCategory::Transactional,
            subject: "{{event_name}} is live".into(),
            html_body: "<p>Hi {{user_name}}</p>".into(),
            text_body: String::new(),
            variables: vec!["event_name".into()],
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::UndeclaredPlaceholders(vec!["user_name".into()])
        );
    }
}
