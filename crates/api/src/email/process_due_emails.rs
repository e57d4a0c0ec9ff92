use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::process_due_emails;
use mingle_notify_domain::{RetryPolicy, ScheduledEmail, ScheduledEmailStatus};
use mingle_notify_infra::MingleContext;
use tracing::{error, info, warn};

pub async fn process_due_emails_controller(
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let usecase = ProcessDueEmailsUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(process_due_emails::APIResponse {
                sent: res.sent,
                retried: res.retried,
                failed: res.failed,
                expired: res.expired,
            })
        })
        .map_err(MingleError::from)
}

/// One dispatcher pass over the delayed-send queue: expire stale pending
/// records, claim the due ones and attempt delivery for each. Runs on an
/// interval from the job scheduler and on demand from the API.
#[derive(Debug)]
pub struct ProcessDueEmailsUseCase {}

#[derive(Debug, Default, PartialEq)]
pub struct UseCaseRes {
    pub sent: usize,
    pub retried: usize,
    pub failed: usize,
    pub expired: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessDueEmailsUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessDueEmails";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let mut res = UseCaseRes::default();

        // Records that sat pending past the expiry window are never
        // attempted. This keeps an outage from producing a burst of stale
        // sends when the dispatcher comes back.
        let expired = ctx
            .repos
            .scheduled_emails
            .expire_pending_before(now - ctx.config.pending_expiry_millis)
            .await;
        for email in &expired {
            warn!(
                "Scheduled email {} expired after sitting pending since {}",
                email.id, email.scheduled_for
            );
        }
        res.expired = expired.len();

        // The claim flips due records to `processing`, so no other
        // dispatcher pass can pick them up concurrently.
        let due = ctx.repos.scheduled_emails.claim_due(now).await;
        for mut email in due {
            match attempt_delivery(&mut email, ctx, now).await {
                DeliveryOutcome::Sent => res.sent += 1,
                DeliveryOutcome::Retried => res.retried += 1,
                DeliveryOutcome::Failed => res.failed += 1,
            }
            ctx.repos
                .scheduled_emails
                .save(&email)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        if res != UseCaseRes::default() {
            info!(
                "Dispatch pass done. sent: {}, retried: {}, failed: {}, expired: {}",
                res.sent, res.retried, res.failed, res.expired
            );
        }
        Ok(res)
    }
}

enum DeliveryOutcome {
    Sent,
    Retried,
    Failed,
}

async fn attempt_delivery(
    email: &mut ScheduledEmail,
    ctx: &MingleContext,
    now: i64,
) -> DeliveryOutcome {
    // User, email address and template are resolved at send time. When any
    // of them is gone retrying cannot help, so the record fails directly.
    let user = match ctx.repos.users.find(&email.user_id).await {
        Some(user) => user,
        None => {
            error!("Abandoning scheduled email {}: user is gone", email.id);
            email.abandon("User not found at dispatch time");
            return DeliveryOutcome::Failed;
        }
    };
    let recipient = match &user.email {
        Some(address) => address.clone(),
        None => {
            error!("Abandoning scheduled email {}: user has no address", email.id);
            email.abandon("User has no email address");
            return DeliveryOutcome::Failed;
        }
    };
    let template = match ctx.repos.email_templates.find(&email.template_id).await {
        Some(template) => template,
        None => {
            error!("Abandoning scheduled email {}: template is gone", email.id);
            email.abandon("Template not found at dispatch time");
            return DeliveryOutcome::Failed;
        }
    };

    let rendered = match template.render(&email.payload.template_data(&user)) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("Abandoning scheduled email {}: {}", email.id, e);
            email.abandon(&e.to_string());
            return DeliveryOutcome::Failed;
        }
    };

    match ctx.mailer.deliver(&recipient, &rendered).await {
        Ok(()) => {
            email.mark_sent(now);
            DeliveryOutcome::Sent
        }
        Err(e) => {
            let policy = RetryPolicy {
                base_delay_minutes: ctx.config.retry_base_delay_minutes,
                ..Default::default()
            };
            let retry_at = now + policy.delay_millis(email.attempts + 1);
            email.record_failure(&e.to_string(), retry_at);
            if email.status == ScheduledEmailStatus::Failed {
                error!(
                    "Scheduled email {} failed permanently after {} attempts: {}",
                    email.id, email.attempts, e
                );
                DeliveryOutcome::Failed
            } else {
                warn!(
                    "Delivery of scheduled email {} failed, retrying at {}: {}",
                    email.id, retry_at, e
                );
                DeliveryOutcome::Retried
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::email::test_helpers::{insert_scheduled_email, insert_template, TestSys};
    use mingle_notify_domain::{TemplateCategory, User};
    use mingle_notify_infra::{setup_context, InMemoryMailer};
    use std::sync::Arc;

    const NOW: i64 = 1_700_043_200_000;

    struct TestContext {
        ctx: MingleContext,
        mailer: Arc<InMemoryMailer>,
        user: User,
        template_id: mingle_notify_domain::ID,
    }

    async fn setup() -> TestContext {
        let mut ctx = setup_context().await;
        ctx.sys = Arc::new(TestSys(NOW));
        let mailer = Arc::new(InMemoryMailer::new());
        ctx.mailer = mailer.clone();

        let mut user = User::new("ana", "Ana Berg", 0);
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

        TestContext {
            ctx,
            mailer,
            user,
            template_id,
        }
    }

    #[actix_web::test]
    async fn delivers_due_pending_emails() {
        let TestContext {
            ctx,
            mailer,
            user,
            template_id,
        } = setup().await;
        let email = insert_scheduled_email(&ctx, &user.id, &template_id, NOW - 1000, 3).await;

        let res = execute(ProcessDueEmailsUseCase {}, &ctx).await.unwrap();
        assert_eq!(res.sent, 1);
        assert_eq!(mailer.sent_count(), 1);

        let stored = ctx.repos.scheduled_emails.find(&email.id).await.unwrap();
        assert_eq!(stored.status, ScheduledEmailStatus::Sent);
        assert_eq!(stored.sent_at, Some(NOW));

        // Terminal records are never attempted again.
        let res = execute(ProcessDueEmailsUseCase {}, &ctx).await.unwrap();
        assert_eq!(res, UseCaseRes::default());
        assert_eq!(mailer.sent_count(), 1);
    }

    #[actix_web::test]
    async fn future_emails_are_left_alone() {
        let TestContext {
            ctx,
            mailer,
            user,
            template_id,
        } = setup().await;
        insert_scheduled_email(&ctx, &user.id, &template_id, NOW + 60_000, 3).await;

        let res = execute(ProcessDueEmailsUseCase {}, &ctx).await.unwrap();
        assert_eq!(res, UseCaseRes::default());
        assert_eq!(mailer.sent_count(), 0);
    }

    #[actix_web::test]
    async fn three_failures_exhaust_the_retry_budget() {
        let TestContext {
            ctx: base_ctx,
            mailer,
            user,
            template_id,
        } = setup().await;
        mailer.fail_next(3);
        let email = insert_scheduled_email(&base_ctx, &user.id, &template_id, NOW - 1000, 3).await;

        let mut now = NOW;
        for attempt in 1..=3_i64 {
            let mut ctx = base_ctx.clone();
            ctx.sys = Arc::new(TestSys(now));
            let res = execute(ProcessDueEmailsUseCase {}, &ctx).await.unwrap();

            let stored = ctx.repos.scheduled_emails.find(&email.id).await.unwrap();
            assert_eq!(stored.attempts, attempt);
            if attempt < 3 {
                assert_eq!(res.retried, 1);
                assert_eq!(stored.status, ScheduledEmailStatus::Pending);
                // Jump past the backoff so the next pass claims it again.
                now = stored.scheduled_for + 1;
            } else {
                assert_eq!(res.failed, 1);
                assert_eq!(stored.status, ScheduledEmailStatus::Failed);
                assert!(stored.last_error.is_some());
            }
        }
        assert_eq!(mailer.sent_count(), 0);
    }

    #[actix_web::test]
    async fn stale_pending_emails_expire_untouched() {
        let TestContext {
            ctx,
            mailer,
            user,
            template_id,
        } = setup().await;
        let stale_for = NOW - ctx.config.pending_expiry_millis - 1000;
        let email = insert_scheduled_email(&ctx, &user.id, &template_id, stale_for, 3).await;

        let res = execute(ProcessDueEmailsUseCase {}, &ctx).await.unwrap();
        assert_eq!(res.expired, 1);
        assert_eq!(res.sent, 0);

        let stored = ctx.repos.scheduled_emails.find(&email.id).await.unwrap();
        assert_eq!(stored.status, ScheduledEmailStatus::Expired);
        assert_eq!(stored.attempts, 0);
        assert_eq!(mailer.sent_count(), 0);
    }

    #[actix_web::test]
    async fn recipient_without_address_fails_without_retry() {
        let TestContext {
            ctx,
            mailer,
            template_id,
            ..
        } = setup().await;
        let mute = User::new("bo", "Bo Lindqvist", 0);
        ctx.repos.users.insert(&mute).await.unwrap();
        let email = insert_scheduled_email(&ctx, &mute.id, &template_id, NOW - 1000, 3).await;

        let res = execute(ProcessDueEmailsUseCase {}, &ctx).await.unwrap();
        assert_eq!(res.failed, 1);

        let stored = ctx.repos.scheduled_emails.find(&email.id).await.unwrap();
        assert_eq!(stored.status, ScheduledEmailStatus::Failed);
        assert_eq!(stored.attempts, 0);
        assert_eq!(mailer.sent_count(), 0);
    }

    #[actix_web::test]
    async fn records_already_processing_are_not_claimed() {
        let TestContext {
            ctx,
            mailer,
            user,
            template_id,
        } = setup().await;
        let mut email = insert_scheduled_email(&ctx, &user.id, &template_id, NOW - 1000, 3).await;
        email.status = ScheduledEmailStatus::Processing;
        ctx.repos.scheduled_emails.save(&email).await.unwrap();

        let res = execute(ProcessDueEmailsUseCase {}, &ctx).await.unwrap();
        assert_eq!(res, UseCaseRes::default());
        assert_eq!(mailer.sent_count(), 0);
    }
}
