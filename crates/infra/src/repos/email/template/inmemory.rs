use super::IEmailTemplateRepo;
use crate::repos::shared::inmemory_repo::*;
use mingle_notify_domain::{EmailTemplate, ID};

pub struct InMemoryEmailTemplateRepo {
    templates: std::sync::Mutex<Vec<EmailTemplate>>,
}

impl InMemoryEmailTemplateRepo {
    pub fn new() -> Self {
        Self {
            templates: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEmailTemplateRepo for InMemoryEmailTemplateRepo {
    async fn insert(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        insert(template, &self.templates);
        Ok(())
    }

    async fn save(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        save(template, &self.templates);
        Ok(())
    }

    async fn find(&self, template_id: &ID) -> Option<EmailTemplate> {
        find(template_id, &self.templates)
    }
}
