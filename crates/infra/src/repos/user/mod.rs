mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserRepo;
use mingle_notify_domain::{User, ID};
pub use postgres::PostgresUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
    async fn find_by_username(&self, username: &str) -> Option<User>;
}
