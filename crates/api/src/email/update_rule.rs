use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::update_rule::*;
use mingle_notify_domain::{EmailRule, RuleConditions, ID};
use mingle_notify_infra::MingleContext;

pub async fn update_rule_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = UpdateRuleUseCase {
        rule_id: path_params.rule_id.clone(),
        active: body.active,
        conditions: body.conditions,
        delay_minutes: body.delay_minutes,
        priority: body.priority,
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Ok().json(APIResponse::new(rule)))
        .map_err(MingleError::from)
}

/// Operators edit rules in place; disabling one is `active = false`, rules
/// are never hard-deleted.
#[derive(Debug)]
pub struct UpdateRuleUseCase {
    pub rule_id: ID,
    pub active: Option<bool>,
    pub conditions: Option<RuleConditions>,
    pub delay_minutes: Option<i64>,
    pub priority: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidDelay(i64),
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(rule_id) => Self::NotFound(format!(
                "The email rule with id: {}, was not found.",
                rule_id
            )),
            UseCaseError::InvalidDelay(delay) => Self::BadClientData(format!(
                "The delay: {} is invalid, it cannot be negative.",
                delay
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateRuleUseCase {
    type Response = EmailRule;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateRule";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let mut rule = ctx
            .repos
            .email_rules
            .find(&self.rule_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.rule_id.clone()))?;

        if let Some(delay) = self.delay_minutes {
            if delay < 0 {
                return Err(UseCaseError::InvalidDelay(delay));
            }
            rule.delay_minutes = delay;
        }
        if let Some(active) = self.active {
            rule.active = active;
        }
        if let Some(conditions) = self.conditions.take() {
            rule.conditions = conditions;
        }
        if let Some(priority) = self.priority {
            rule.priority = priority;
        }

        ctx.repos
            .email_rules
            .save(&rule)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(rule)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::email::test_helpers::insert_template;
    use mingle_notify_domain::{EventType, TemplateCategory};
    use mingle_notify_infra::setup_context;

    #[actix_web::test]
    async fn soft_disables_a_rule() {
        let ctx = setup_context().await;
        let template_id = insert_template(
            &ctx,
            "welcome",
            TemplateCategory::Transactional,
            "Welcome",
            vec![],
        )
        .await;
        let rule = EmailRule::new("welcome", EventType::CalendarMemberJoined, &template_id);
        ctx.repos.email_rules.insert(&rule).await.unwrap();

        let usecase = UpdateRuleUseCase {
            rule_id: rule.id.clone(),
            active: Some(false),
            conditions: None,
            delay_minutes: None,
            priority: None,
        };
        let updated = execute(usecase, &ctx).await.unwrap();
        assert!(!updated.active);

        let stored = ctx.repos.email_rules.find(&rule.id).await.unwrap();
        assert!(!stored.active);
    }

    #[actix_web::test]
    async fn rejects_negative_delay() {
        let ctx = setup_context().await;
        let template_id = insert_template(
            &ctx,
            "welcome",
            TemplateCategory::Transactional,
            "Welcome",
            vec![],
        )
        .await;
        let rule = EmailRule::new("welcome", EventType::CalendarMemberJoined, &template_id);
        ctx.repos.email_rules.insert(&rule).await.unwrap();

        let usecase = UpdateRuleUseCase {
            rule_id: rule.id.clone(),
            active: None,
            conditions: None,
            delay_minutes: Some(-1),
            priority: None,
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidDelay(-1));
    }
}
