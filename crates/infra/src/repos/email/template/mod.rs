mod inmemory;
mod postgres;

pub use inmemory::InMemoryEmailTemplateRepo;
use mingle_notify_domain::{EmailTemplate, ID};
pub use postgres::PostgresEmailTemplateRepo;

#[async_trait::async_trait]
pub trait IEmailTemplateRepo: Send + Sync {
    async fn insert(&self, template: &EmailTemplate) -> anyhow::Result<()>;
    async fn save(&self, template: &EmailTemplate) -> anyhow::Result<()>;
    async fn find(&self, template_id: &ID) -> Option<EmailTemplate>;
}
