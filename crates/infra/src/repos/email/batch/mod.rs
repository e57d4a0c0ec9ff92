mod inmemory;
mod postgres;

pub use inmemory::InMemoryEmailBatchRepo;
use mingle_notify_domain::{EmailBatch, ID};
pub use postgres::PostgresEmailBatchRepo;

#[async_trait::async_trait]
pub trait IEmailBatchRepo: Send + Sync {
    async fn insert(&self, batch: &EmailBatch) -> anyhow::Result<()>;
    async fn save(&self, batch: &EmailBatch) -> anyhow::Result<()>;
    async fn find(&self, batch_id: &ID) -> Option<EmailBatch>;
}
