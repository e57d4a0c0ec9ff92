mod inmemory;
mod postgres;

pub use inmemory::InMemoryEmailEventRepo;
use mingle_notify_domain::{EmailEvent, ID};
pub use postgres::PostgresEmailEventRepo;

#[async_trait::async_trait]
pub trait IEmailEventRepo: Send + Sync {
    async fn insert(&self, event: &EmailEvent) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<EmailEvent>;
    /// Flips `processed` to true. The flag only ever moves false -> true.
    async fn mark_processed(&self, event_id: &ID) -> anyhow::Result<()>;
}
