use super::IEmailEventRepo;
use mingle_notify_domain::{EmailEvent, EmailEventPayload, ID};
use sqlx::{types::Json, types::Uuid, FromRow, PgPool};

pub struct PostgresEmailEventRepo {
    pool: PgPool,
}

impl PostgresEmailEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EmailEventRaw {
    email_event_uid: Uuid,
    user_uid: Uuid,
    payload: Json<EmailEventPayload>,
    ts: i64,
    processed: bool,
}

impl From<EmailEventRaw> for EmailEvent {
    fn from(raw: EmailEventRaw) -> Self {
        Self {
            id: raw.email_event_uid.into(),
            user_id: raw.user_uid.into(),
            payload: raw.payload.0,
            timestamp: raw.ts,
            processed: raw.processed,
        }
    }
}

#[async_trait::async_trait]
impl IEmailEventRepo for PostgresEmailEventRepo {
    async fn insert(&self, event: &EmailEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_events
            (email_event_uid, user_uid, payload, ts, processed)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.id.inner_ref())
        .bind(event.user_id.inner_ref())
        .bind(Json(&event.payload))
        .bind(event.timestamp)
        .bind(event.processed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<EmailEvent> {
        sqlx::query_as::<_, EmailEventRaw>(
            r#"
            SELECT * FROM email_events
            WHERE email_event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(Into::into)
    }

    async fn mark_processed(&self, event_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE email_events SET processed = TRUE
            WHERE email_event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
