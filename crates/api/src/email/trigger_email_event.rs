use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::trigger_email_event::*;
use mingle_notify_domain::{
    EmailEvent, EmailEventPayload, MatchInput, ScheduledEmail, ScheduledEmailStatus, ID,
};
use mingle_notify_infra::MingleContext;
use tracing::{error, info};

pub async fn trigger_email_event_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = TriggerEmailEventUseCase {
        user_id: body.user_id,
        payload: body.payload,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.email_event, res.scheduled)))
        .map_err(MingleError::from)
}

/// The sole entry point by which the rest of the product notifies the email
/// engine of a domain occurrence. Records the occurrence, evaluates rules
/// and materializes one `ScheduledEmail` per match.
#[derive(Debug)]
pub struct TriggerEmailEventUseCase {
    pub user_id: ID,
    pub payload: EmailEventPayload,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub email_event: EmailEvent,
    pub scheduled: Vec<ScheduledEmail>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    UserNotFound(ID),
    /// A matched rule references a template that is gone.
    TemplateNotFound(ID),
    /// The template declares variables the payload cannot provide.
    MissingTemplateVariables(Vec<String>),
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::TemplateNotFound(template_id) => Self::NotFound(format!(
                "The email template with id: {}, was not found.",
                template_id
            )),
            UseCaseError::MissingTemplateVariables(names) => Self::BadClientData(format!(
                "The event payload does not provide the template variables: {:?}",
                names
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for TriggerEmailEventUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "TriggerEmailEvent";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let user = ctx
            .repos
            .users
            .find(&self.user_id)
            .await
            .ok_or_else(|| UseCaseError::UserNotFound(self.user_id.clone()))?;

        let now = ctx.sys.get_timestamp_millis();
        let email_event = EmailEvent::new(&user.id, self.payload.clone(), now);
        ctx.repos
            .email_events
            .insert(&email_event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // Event-attribute conditions are resolved against the stored event
        // at trigger time. A vanished record simply fails those conditions.
        let calendar_event = match self.payload.calendar_event_id() {
            Some(event_id) => ctx.repos.events.find(event_id).await,
            None => None,
        };

        let input = MatchInput {
            payload: &self.payload,
            user: &user,
            calendar_event: calendar_event.as_ref(),
            now,
        };

        // All matching active rules fire independently. `find_by_trigger`
        // returns highest priority first, which is processing order only.
        let rules = ctx.repos.email_rules.find_by_trigger(input.payload.event_type()).await;
        let mut scheduled = Vec::new();
        for rule in rules.iter().filter(|r| r.matches(&input)) {
            let template = ctx
                .repos
                .email_templates
                .find(&rule.template_id)
                .await
                .ok_or_else(|| UseCaseError::TemplateNotFound(rule.template_id.clone()))?;

            // Reject before anything is queued, so the caller learns about
            // a rule/template mismatch at trigger time.
            let data = self.payload.template_data(&user);
            let missing = template.missing_variables(&data);
            if !missing.is_empty() {
                return Err(UseCaseError::MissingTemplateVariables(missing));
            }

            let email = ScheduledEmail {
                id: Default::default(),
                user_id: user.id.clone(),
                rule_id: rule.id.clone(),
                template_id: template.id.clone(),
                payload: self.payload.clone(),
                scheduled_for: now + rule.delay_minutes * 60 * 1000,
                status: ScheduledEmailStatus::Pending,
                attempts: 0,
                max_attempts: ctx.config.max_send_attempts,
                last_error: None,
                sent_at: None,
                created: now,
            };
            ctx.repos
                .scheduled_emails
                .insert(&email)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            scheduled.push(email);
        }

        if let Err(e) = ctx.repos.email_events.mark_processed(&email_event.id).await {
            error!(
                "Unable to mark email event {} as processed. Err: {:?}",
                email_event.id, e
            );
            return Err(UseCaseError::StorageError);
        }
        let mut email_event = email_event;
        email_event.processed = true;

        info!(
            "Email event {} matched {} rule(s)",
            email_event.id,
            scheduled.len()
        );

        Ok(UseCaseRes {
            email_event,
            scheduled,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::email::test_helpers::{insert_template, TestSys};
    use mingle_notify_domain::{
        EmailRule, EventType, FieldFilter, FieldValue, FilterOp, RuleConditions,
        TemplateCategory, User,
    };
    use mingle_notify_infra::setup_context;
    use std::sync::Arc;

    const NOW: i64 = 1_700_043_200_000;

    async fn setup() -> (MingleContext, User, ID) {
        let mut ctx = setup_context().await;
        ctx.sys = Arc::new(TestSys(NOW));

        let mut user = User::new("ana", "Ana Berg", NOW - 1000);
        user.email = Some("ana@example.com".into());
        ctx.repos.users.insert(&user).await.unwrap();

        let template_id = insert_template(
            &ctx,
            "goes-live",
            TemplateCategory::Transactional,
            "{{event_name}} is live",
            vec!["event_name", "user_name"],
        )
        .await;

        (ctx, user, template_id)
    }

    fn goes_live_payload() -> EmailEventPayload {
        EmailEventPayload::EventGoesLive {
            event_id: Default::default(),
            event_name: "Rust Meetup".into(),
            start_ts: NOW,
            location: None,
            virtual_link: None,
        }
    }

    #[actix_web::test]
    async fn matching_rule_schedules_an_email_and_marks_event_processed() {
        let (ctx, user, template_id) = setup().await;
        let mut rule = EmailRule::new("goes-live", EventType::EventGoesLive, &template_id);
        rule.delay_minutes = 10;
        ctx.repos.email_rules.insert(&rule).await.unwrap();

        let usecase = TriggerEmailEventUseCase {
            user_id: user.id.clone(),
            payload: goes_live_payload(),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert!(res.email_event.processed);
        assert_eq!(res.scheduled.len(), 1);
        let scheduled = &res.scheduled[0];
        assert_eq!(scheduled.scheduled_for, NOW + 10 * 60 * 1000);
        assert_eq!(scheduled.status, ScheduledEmailStatus::Pending);
        assert_eq!(scheduled.rule_id, rule.id);

        let stored = ctx
            .repos
            .email_events
            .find(&res.email_event.id)
            .await
            .unwrap();
        assert!(stored.processed);
    }

    #[actix_web::test]
    async fn inactive_or_mismatched_rules_do_not_fire() {
        let (ctx, user, template_id) = setup().await;

        let mut inactive = EmailRule::new("inactive", EventType::EventGoesLive, &template_id);
        inactive.active = false;
        ctx.repos.email_rules.insert(&inactive).await.unwrap();

        let other_trigger = EmailRule::new("invites", EventType::EventInvitation, &template_id);
        ctx.repos.email_rules.insert(&other_trigger).await.unwrap();

        let mut filtered = EmailRule::new("galas-only", EventType::EventGoesLive, &template_id);
        filtered.conditions = RuleConditions {
            filters: vec![FieldFilter {
                field: "event_name".into(),
                op: FilterOp::Contains,
                value: Some(FieldValue::Text("Gala".into())),
            }],
            ..Default::default()
        };
        ctx.repos.email_rules.insert(&filtered).await.unwrap();

        let usecase = TriggerEmailEventUseCase {
            user_id: user.id.clone(),
            payload: goes_live_payload(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert!(res.scheduled.is_empty());
        assert!(res.email_event.processed);
    }

    #[actix_web::test]
    async fn all_matching_rules_fire_independently() {
        let (ctx, user, template_id) = setup().await;
        let mut low = EmailRule::new("low", EventType::EventGoesLive, &template_id);
        low.priority = 0;
        let mut high = EmailRule::new("high", EventType::EventGoesLive, &template_id);
        high.priority = 10;
        ctx.repos.email_rules.insert(&low).await.unwrap();
        ctx.repos.email_rules.insert(&high).await.unwrap();

        let usecase = TriggerEmailEventUseCase {
            user_id: user.id.clone(),
            payload: goes_live_payload(),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        // Priority orders processing, it never makes matches exclusive.
        assert_eq!(res.scheduled.len(), 2);
        assert_eq!(res.scheduled[0].rule_id, high.id);
        assert_eq!(res.scheduled[1].rule_id, low.id);
    }

    #[actix_web::test]
    async fn rejects_template_with_underivable_variables() {
        let (ctx, user, _) = setup().await;
        let template_id = insert_template(
            &ctx,
            "needs-coupon",
            TemplateCategory::Marketing,
            "{{coupon_code}}",
            vec!["coupon_code"],
        )
        .await;
        let rule = EmailRule::new("coupons", EventType::EventGoesLive, &template_id);
        ctx.repos.email_rules.insert(&rule).await.unwrap();

        let usecase = TriggerEmailEventUseCase {
            user_id: user.id.clone(),
            payload: goes_live_payload(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::MissingTemplateVariables(vec!["coupon_code".into()])
        );
    }

    #[actix_web::test]
    async fn unknown_user_is_rejected() {
        let (ctx, _, _) = setup().await;
        let stranger = ID::default();
        let usecase = TriggerEmailEventUseCase {
            user_id: stranger.clone(),
            payload: goes_live_payload(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::UserNotFound(stranger));
    }
}
