use super::IScheduledEmailRepo;
use crate::repos::shared::inmemory_repo::*;
use mingle_notify_domain::{ScheduledEmail, ScheduledEmailStatus, ID};

pub struct InMemoryScheduledEmailRepo {
    emails: std::sync::Mutex<Vec<ScheduledEmail>>,
}

impl InMemoryScheduledEmailRepo {
    pub fn new() -> Self {
        Self {
            emails: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IScheduledEmailRepo for InMemoryScheduledEmailRepo {
    async fn insert(&self, email: &ScheduledEmail) -> anyhow::Result<()> {
        insert(email, &self.emails);
        Ok(())
    }

    async fn save(&self, email: &ScheduledEmail) -> anyhow::Result<()> {
        save(email, &self.emails);
        Ok(())
    }

    async fn find(&self, email_id: &ID) -> Option<ScheduledEmail> {
        find(email_id, &self.emails)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<ScheduledEmail> {
        find_by(&self.emails, |e| e.user_id == *user_id)
    }

    async fn claim_due(&self, now: i64) -> Vec<ScheduledEmail> {
        // One critical section, so two concurrent claimers cannot both see
        // the same pending record.
        update_where(
            &self.emails,
            |e| e.status == ScheduledEmailStatus::Pending && e.scheduled_for <= now,
            |e| e.status = ScheduledEmailStatus::Processing,
        )
    }

    async fn expire_pending_before(&self, cutoff: i64) -> Vec<ScheduledEmail> {
        update_where(
            &self.emails,
            |e| e.status == ScheduledEmailStatus::Pending && e.scheduled_for <= cutoff,
            |e| e.status = ScheduledEmailStatus::Expired,
        )
    }
}
