use super::IScheduledEmailRepo;
use mingle_notify_domain::{
    EmailEventPayload, ScheduledEmail, ScheduledEmailStatus, ID,
};
use sqlx::{types::Json, types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresScheduledEmailRepo {
    pool: PgPool,
}

impl PostgresScheduledEmailRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledEmailRaw {
    scheduled_email_uid: Uuid,
    user_uid: Uuid,
    rule_uid: Uuid,
    template_uid: Uuid,
    payload: Json<EmailEventPayload>,
    scheduled_for: i64,
    status: String,
    attempts: i64,
    max_attempts: i64,
    last_error: Option<String>,
    sent_at: Option<i64>,
    created: i64,
}

impl ScheduledEmailRaw {
    fn into_domain(self) -> Option<ScheduledEmail> {
        let status = match self.status.parse::<ScheduledEmailStatus>() {
            Ok(status) => status,
            Err(e) => {
                error!(
                    "Skipping scheduled email {} with bad status: {}",
                    self.scheduled_email_uid, e
                );
                return None;
            }
        };
        Some(ScheduledEmail {
            id: self.scheduled_email_uid.into(),
            user_id: self.user_uid.into(),
            rule_id: self.rule_uid.into(),
            template_id: self.template_uid.into(),
            payload: self.payload.0,
            scheduled_for: self.scheduled_for,
            status,
            attempts: self.attempts,
            max_attempts: self.max_attempts,
            last_error: self.last_error,
            sent_at: self.sent_at,
            created: self.created,
        })
    }
}

#[async_trait::async_trait]
impl IScheduledEmailRepo for PostgresScheduledEmailRepo {
    async fn insert(&self, email: &ScheduledEmail) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scheduled_emails
            (scheduled_email_uid, user_uid, rule_uid, template_uid, payload, scheduled_for, status, attempts, max_attempts, last_error, sent_at, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(email.id.inner_ref())
        .bind(email.user_id.inner_ref())
        .bind(email.rule_id.inner_ref())
        .bind(email.template_id.inner_ref())
        .bind(Json(&email.payload))
        .bind(email.scheduled_for)
        .bind(email.status.as_str())
        .bind(email.attempts)
        .bind(email.max_attempts)
        .bind(&email.last_error)
        .bind(email.sent_at)
        .bind(email.created)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, email: &ScheduledEmail) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_emails SET
                scheduled_for = $2,
                status = $3,
                attempts = $4,
                last_error = $5,
                sent_at = $6
            WHERE scheduled_email_uid = $1
            "#,
        )
        .bind(email.id.inner_ref())
        .bind(email.scheduled_for)
        .bind(email.status.as_str())
        .bind(email.attempts)
        .bind(&email.last_error)
        .bind(email.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, email_id: &ID) -> Option<ScheduledEmail> {
        sqlx::query_as::<_, ScheduledEmailRaw>(
            r#"
            SELECT * FROM scheduled_emails
            WHERE scheduled_email_uid = $1
            "#,
        )
        .bind(email_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(ScheduledEmailRaw::into_domain)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<ScheduledEmail> {
        sqlx::query_as::<_, ScheduledEmailRaw>(
            r#"
            SELECT * FROM scheduled_emails
            WHERE user_uid = $1
            ORDER BY scheduled_for
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|_| Vec::new())
        .into_iter()
        .filter_map(ScheduledEmailRaw::into_domain)
        .collect()
    }

    async fn claim_due(&self, now: i64) -> Vec<ScheduledEmail> {
        // A single UPDATE .. RETURNING is atomic, so two dispatchers can
        // never claim the same row.
        sqlx::query_as::<_, ScheduledEmailRaw>(
            r#"
            UPDATE scheduled_emails
                SET status = 'processing'
            WHERE status = 'pending' AND scheduled_for <= $1
            RETURNING *
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|_| Vec::new())
        .into_iter()
        .filter_map(ScheduledEmailRaw::into_domain)
        .collect()
    }

    async fn expire_pending_before(&self, cutoff: i64) -> Vec<ScheduledEmail> {
        sqlx::query_as::<_, ScheduledEmailRaw>(
            r#"
            UPDATE scheduled_emails
                SET status = 'expired'
            WHERE status = 'pending' AND scheduled_for <= $1
            RETURNING *
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|_| Vec::new())
        .into_iter()
        .filter_map(ScheduledEmailRaw::into_domain)
        .collect()
    }
}
