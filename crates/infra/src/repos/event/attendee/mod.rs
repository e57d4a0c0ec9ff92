mod inmemory;
mod postgres;

pub use inmemory::InMemoryAttendeeRepo;
use mingle_notify_domain::{Attendee, ID};
pub use postgres::PostgresAttendeeRepo;

#[async_trait::async_trait]
pub trait IAttendeeRepo: Send + Sync {
    async fn insert(&self, attendee: &Attendee) -> anyhow::Result<()>;
    async fn save(&self, attendee: &Attendee) -> anyhow::Result<()>;
    async fn find_by_event(&self, event_id: &ID) -> Vec<Attendee>;
    async fn find_by_event_and_user(&self, event_id: &ID, user_id: &ID) -> Option<Attendee>;
}
