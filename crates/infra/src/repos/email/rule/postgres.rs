use super::IEmailRuleRepo;
use mingle_notify_domain::{EmailRule, EventType, RuleConditions, ID};
use sqlx::{types::Json, types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresEmailRuleRepo {
    pool: PgPool,
}

impl PostgresEmailRuleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EmailRuleRaw {
    rule_uid: Uuid,
    name: String,
    trigger: String,
    conditions: Json<RuleConditions>,
    delay_minutes: i64,
    template_uid: Uuid,
    active: bool,
    priority: i64,
}

impl EmailRuleRaw {
    fn into_domain(self) -> Option<EmailRule> {
        let trigger = match self.trigger.parse::<EventType>() {
            Ok(trigger) => trigger,
            Err(e) => {
                error!("Skipping email rule {} with bad trigger: {}", self.rule_uid, e);
                return None;
            }
        };
        Some(EmailRule {
            id: self.rule_uid.into(),
            name: self.name,
            trigger,
            conditions: self.conditions.0,
            delay_minutes: self.delay_minutes,
            template_id: self.template_uid.into(),
            active: self.active,
            priority: self.priority,
        })
    }
}

#[async_trait::async_trait]
impl IEmailRuleRepo for PostgresEmailRuleRepo {
    async fn insert(&self, rule: &EmailRule) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_rules
            (rule_uid, name, trigger, conditions, delay_minutes, template_uid, active, priority)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(rule.id.inner_ref())
        .bind(&rule.name)
        .bind(rule.trigger.as_str())
        .bind(Json(&rule.conditions))
        .bind(rule.delay_minutes)
        .bind(rule.template_id.inner_ref())
        .bind(rule.active)
        .bind(rule.priority)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, rule: &EmailRule) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE email_rules SET
                name = $2,
                trigger = $3,
                conditions = $4,
                delay_minutes = $5,
                template_uid = $6,
                active = $7,
                priority = $8
            WHERE rule_uid = $1
            "#,
        )
        .bind(rule.id.inner_ref())
        .bind(&rule.name)
        .bind(rule.trigger.as_str())
        .bind(Json(&rule.conditions))
        .bind(rule.delay_minutes)
        .bind(rule.template_id.inner_ref())
        .bind(rule.active)
        .bind(rule.priority)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, rule_id: &ID) -> Option<EmailRule> {
        sqlx::query_as::<_, EmailRuleRaw>(
            r#"
            SELECT * FROM email_rules
            WHERE rule_uid = $1
            "#,
        )
        .bind(rule_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(EmailRuleRaw::into_domain)
    }

    async fn find_by_trigger(&self, trigger: EventType) -> Vec<EmailRule> {
        sqlx::query_as::<_, EmailRuleRaw>(
            r#"
            SELECT * FROM email_rules
            WHERE trigger = $1
            ORDER BY priority DESC
            "#,
        )
        .bind(trigger.as_str())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|_| Vec::new())
        .into_iter()
        .filter_map(EmailRuleRaw::into_domain)
        .collect()
    }

    async fn all(&self) -> Vec<EmailRule> {
        sqlx::query_as::<_, EmailRuleRaw>(
            r#"
            SELECT * FROM email_rules
            ORDER BY priority DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|_| Vec::new())
        .into_iter()
        .filter_map(EmailRuleRaw::into_domain)
        .collect()
    }
}
