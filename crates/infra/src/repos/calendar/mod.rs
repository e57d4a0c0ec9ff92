mod inmemory;
mod postgres;

pub use inmemory::InMemoryCalendarRepo;
use mingle_notify_domain::{Calendar, ID};
pub use postgres::PostgresCalendarRepo;

#[async_trait::async_trait]
pub trait ICalendarRepo: Send + Sync {
    async fn insert(&self, calendar: &Calendar) -> anyhow::Result<()>;
    async fn save(&self, calendar: &Calendar) -> anyhow::Result<()>;
    async fn find(&self, calendar_id: &ID) -> Option<Calendar>;
}
