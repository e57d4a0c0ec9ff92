use super::IEmailRuleRepo;
use crate::repos::shared::inmemory_repo::*;
use mingle_notify_domain::{EmailRule, EventType, ID};

pub struct InMemoryEmailRuleRepo {
    rules: std::sync::Mutex<Vec<EmailRule>>,
}

impl InMemoryEmailRuleRepo {
    pub fn new() -> Self {
        Self {
            rules: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEmailRuleRepo for InMemoryEmailRuleRepo {
    async fn insert(&self, rule: &EmailRule) -> anyhow::Result<()> {
        insert(rule, &self.rules);
        Ok(())
    }

    async fn save(&self, rule: &EmailRule) -> anyhow::Result<()> {
        save(rule, &self.rules);
        Ok(())
    }

    async fn find(&self, rule_id: &ID) -> Option<EmailRule> {
        find(rule_id, &self.rules)
    }

    async fn find_by_trigger(&self, trigger: EventType) -> Vec<EmailRule> {
        let mut rules = find_by(&self.rules, |r| r.trigger == trigger);
        rules.sort_by_key(|r| std::cmp::Reverse(r.priority));
        rules
    }

    async fn all(&self) -> Vec<EmailRule> {
        let mut rules = find_by(&self.rules, |_| true);
        rules.sort_by_key(|r| std::cmp::Reverse(r.priority));
        rules
    }
}
