use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::create_rule::*;
use mingle_notify_domain::{EmailRule, EventType, RuleConditions, ID};
use mingle_notify_infra::MingleContext;

pub async fn create_rule_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = CreateRuleUseCase {
        name: body.name,
        trigger: body.trigger,
        template_id: body.template_id,
        conditions: body.conditions.unwrap_or_default(),
        delay_minutes: body.delay_minutes.unwrap_or(0),
        priority: body.priority.unwrap_or(0),
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Created().json(APIResponse::new(rule)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct CreateRuleUseCase {
    pub name: String,
    pub trigger: EventType,
    pub template_id: ID,
    pub conditions: RuleConditions,
    pub delay_minutes: i64,
    pub priority: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidDelay(i64),
    TemplateNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidDelay(delay) => Self::BadClientData(format!(
                "The delay: {} is invalid, it cannot be negative.",
                delay
            )),
            UseCaseError::TemplateNotFound(template_id) => Self::NotFound(format!(
                "The email template with id: {}, was not found.",
                template_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateRuleUseCase {
    type Response = EmailRule;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateRule";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        if self.delay_minutes < 0 {
            return Err(UseCaseError::InvalidDelay(self.delay_minutes));
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

        let mut rule = EmailRule::new(&self.name, self.trigger, &self.template_id);
        rule.conditions = self.conditions.clone();
        rule.delay_minutes = self.delay_minutes;
        rule.priority = self.priority;

        ctx.repos
            .email_rules
            .insert(&rule)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(rule)
    }
}
