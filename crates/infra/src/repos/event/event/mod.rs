mod inmemory;
mod postgres;

pub use inmemory::InMemoryEventRepo;
use mingle_notify_domain::{CalendarEvent, ID};
pub use postgres::PostgresEventRepo;

#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, event: &CalendarEvent) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<CalendarEvent>;
}
