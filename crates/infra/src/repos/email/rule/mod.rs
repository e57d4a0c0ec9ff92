mod inmemory;
mod postgres;

pub use inmemory::InMemoryEmailRuleRepo;
use mingle_notify_domain::{EmailRule, EventType, ID};
pub use postgres::PostgresEmailRuleRepo;

#[async_trait::async_trait]
pub trait IEmailRuleRepo: Send + Sync {
    async fn insert(&self, rule: &EmailRule) -> anyhow::Result<()>;
    async fn save(&self, rule: &EmailRule) -> anyhow::Result<()>;
    async fn find(&self, rule_id: &ID) -> Option<EmailRule>;
    /// All rules for a trigger, highest priority first. Active filtering is
    /// the matcher's business, this is a plain index lookup.
    async fn find_by_trigger(&self, trigger: EventType) -> Vec<EmailRule>;
    async fn all(&self) -> Vec<EmailRule>;
}
