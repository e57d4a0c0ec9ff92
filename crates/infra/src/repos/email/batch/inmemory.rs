use super::IEmailBatchRepo;
use crate::repos::shared::inmemory_repo::*;
use mingle_notify_domain::{EmailBatch, ID};

pub struct InMemoryEmailBatchRepo {
    batches: std::sync::Mutex<Vec<EmailBatch>>,
}

impl InMemoryEmailBatchRepo {
    pub fn new() -> Self {
        Self {
            batches: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEmailBatchRepo for InMemoryEmailBatchRepo {
    async fn insert(&self, batch: &EmailBatch) -> anyhow::Result<()> {
        insert(batch, &self.batches);
        Ok(())
    }

    async fn save(&self, batch: &EmailBatch) -> anyhow::Result<()> {
        save(batch, &self.batches);
        Ok(())
    }

    async fn find(&self, batch_id: &ID) -> Option<EmailBatch> {
        find(batch_id, &self.batches)
    }
}
