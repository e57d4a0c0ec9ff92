mod inmemory;
mod postgres;

pub use inmemory::InMemoryScheduledEmailRepo;
use mingle_notify_domain::{ScheduledEmail, ID};
pub use postgres::PostgresScheduledEmailRepo;

#[async_trait::async_trait]
pub trait IScheduledEmailRepo: Send + Sync {
    async fn insert(&self, email: &ScheduledEmail) -> anyhow::Result<()>;
    async fn save(&self, email: &ScheduledEmail) -> anyhow::Result<()>;
    async fn find(&self, email_id: &ID) -> Option<ScheduledEmail>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<ScheduledEmail>;
    /// Atomically flips due pending records to `processing` and returns
    /// them. The `processing` status is the advisory lock: a record claimed
    /// here is invisible to every other dispatcher pass.
    async fn claim_due(&self, now: i64) -> Vec<ScheduledEmail>;
    /// Flips pending records whose `scheduled_for` lies at or before
    /// `cutoff` to `expired` and returns them.
    async fn expire_pending_before(&self, cutoff: i64) -> Vec<ScheduledEmail>;
}

#[cfg(test)]
mod tests {
    use crate::setup_context;
    use mingle_notify_domain::{EmailEventPayload, ScheduledEmail, ScheduledEmailStatus};

    fn scheduled_email(scheduled_for: i64) -> ScheduledEmail {
        ScheduledEmail {
            id: Default::default(),
            user_id: Default::default(),
            rule_id: Default::default(),
            template_id: Default::default(),
            payload: EmailEventPayload::EventCancelled {
                event_id: Default::default(),
                event_name: "Picnic".into(),
                start_ts: 0,
            },
            scheduled_for,
            status: ScheduledEmailStatus::Pending,
            attempts: 0,
            max_attempts: 3,
            last_error: None,
            sent_at: None,
            created: 0,
        }
    }

    #[tokio::test]
    async fn claim_due_flips_to_processing_exactly_once() {
        let ctx = setup_context().await;
        let due = scheduled_email(1000);
        let not_due = scheduled_email(5000);
        ctx.repos.scheduled_emails.insert(&due).await.unwrap();
        ctx.repos.scheduled_emails.insert(&not_due).await.unwrap();

        let claimed = ctx.repos.scheduled_emails.claim_due(2000).await;
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].id, due.id);
        assert_eq!(claimed[0].status, ScheduledEmailStatus::Processing);

        // A second dispatcher pass must not see the claimed record.
        assert!(ctx.repos.scheduled_emails.claim_due(2000).await.is_empty());
    }

    #[tokio::test]
    async fn expiry_only_touches_pending_records() {
        let ctx = setup_context().await;
        let stale = scheduled_email(1000);
        let mut sent = scheduled_email(1000);
        sent.status = ScheduledEmailStatus::Sent;
        ctx.repos.scheduled_emails.insert(&stale).await.unwrap();
        ctx.repos.scheduled_emails.insert(&sent).await.unwrap();

        let expired = ctx.repos.scheduled_emails.expire_pending_before(1500).await;
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, stale.id);
        assert_eq!(expired[0].status, ScheduledEmailStatus::Expired);

        let untouched = ctx.repos.scheduled_emails.find(&sent.id).await.unwrap();
        assert_eq!(untouched.status, ScheduledEmailStatus::Sent);
    }
}
