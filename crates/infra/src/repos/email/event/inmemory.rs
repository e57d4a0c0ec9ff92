use super::IEmailEventRepo;
use crate::repos::shared::inmemory_repo::*;
use mingle_notify_domain::{EmailEvent, ID};

pub struct InMemoryEmailEventRepo {
    events: std::sync::Mutex<Vec<EmailEvent>>,
}

impl InMemoryEmailEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEmailEventRepo for InMemoryEmailEventRepo {
    async fn insert(&self, event: &EmailEvent) -> anyhow::Result<()> {
        insert(event, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<EmailEvent> {
        find(event_id, &self.events)
    }

    async fn mark_processed(&self, event_id: &ID) -> anyhow::Result<()> {
        update_where(&self.events, |e| e.id == *event_id, |e| e.processed = true);
        Ok(())
    }
}
