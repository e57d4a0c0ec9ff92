use super::IEmailBatchRepo;
use mingle_notify_domain::{EmailBatch, EmailBatchStatus, ID};
use sqlx::{types::Json, types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresEmailBatchRepo {
    pool: PgPool,
}

impl PostgresEmailBatchRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EmailBatchRaw {
    batch_uid: Uuid,
    template_uid: Uuid,
    user_uids: Json<Vec<ID>>,
    status: String,
    total_emails: i64,
    sent_emails: i64,
    failed_emails: i64,
    created: i64,
}

impl EmailBatchRaw {
    fn into_domain(self) -> Option<EmailBatch> {
        let status = match self.status.parse::<EmailBatchStatus>() {
            Ok(status) => status,
            Err(e) => {
                error!("Skipping email batch {} with bad status: {}", self.batch_uid, e);
                return None;
            }
        };
        Some(EmailBatch {
            id: self.batch_uid.into(),
            template_id: self.template_uid.into(),
            user_ids: self.user_uids.0,
            status,
            total_emails: self.total_emails,
            sent_emails: self.sent_emails,
            failed_emails: self.failed_emails,
            created: self.created,
        })
    }
}

#[async_trait::async_trait]
impl IEmailBatchRepo for PostgresEmailBatchRepo {
    async fn insert(&self, batch: &EmailBatch) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_batches
            (batch_uid, template_uid, user_uids, status, total_emails, sent_emails, failed_emails, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(batch.id.inner_ref())
        .bind(batch.template_id.inner_ref())
        .bind(Json(&batch.user_ids))
        .bind(batch.status.as_str())
        .bind(batch.total_emails)
        .bind(batch.sent_emails)
        .bind(batch.failed_emails)
        .bind(batch.created)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, batch: &EmailBatch) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE email_batches SET
                status = $2,
                sent_emails = $3,
                failed_emails = $4
            WHERE batch_uid = $1
            "#,
        )
        .bind(batch.id.inner_ref())
        .bind(batch.status.as_str())
        .bind(batch.sent_emails)
        .bind(batch.failed_emails)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, batch_id: &ID) -> Option<EmailBatch> {
        sqlx::query_as::<_, EmailBatchRaw>(
            r#"
            SELECT * FROM email_batches
            WHERE batch_uid = $1
            "#,
        )
        .bind(batch_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(EmailBatchRaw::into_domain)
    }
}
