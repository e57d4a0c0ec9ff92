use mingle_notify_domain::{
    EmailBatch, EmailBatchStatus, EmailEvent, EmailEventPayload, EmailRule, EmailTemplate,
    EventType, RuleConditions, ScheduledEmail, ScheduledEmailStatus, TemplateCategory, ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailEventDTO {
    pub id: ID,
    pub user_id: ID,
    pub payload: EmailEventPayload,
    pub timestamp: i64,
    pub processed: bool,
}

impl EmailEventDTO {
    pub fn new(event: EmailEvent) -> Self {
        Self {
            id: event.id,
            user_id: event.user_id,
            payload: event.payload,
            timestamp: event.timestamp,
            processed: event.processed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRuleDTO {
    pub id: ID,
    pub name: String,
    pub trigger: EventType,
    pub conditions: RuleConditions,
    pub delay_minutes: i64,
    pub template_id: ID,
    pub active: bool,
    pub priority: i64,
}

impl EmailRuleDTO {
    pub fn new(rule: EmailRule) -> Self {
        Self {
            id: rule.id,
            name: rule.name,
            trigger: rule.trigger,
            conditions: rule.conditions,
            delay_minutes: rule.delay_minutes,
            template_id: rule.template_id,
            active: rule.active,
            priority: rule.priority,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplateDTO {
    pub id: ID,
    pub name: String,
    pub category: TemplateCategory,
    pub version: i64,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub variables: Vec<String>,
}

impl EmailTemplateDTO {
    pub fn new(template: EmailTemplate) -> Self {
        Self {
            id: template.id,
            name: template.name,
            category: template.category,
            version: template.version,
            subject: template.subject,
            html_body: template.html_body,
            text_body: template.text_body,
            variables: template.variables,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEmailDTO {
    pub id: ID,
    pub user_id: ID,
    pub rule_id: ID,
    pub template_id: ID,
    pub scheduled_for: i64,
    pub status: ScheduledEmailStatus,
    pub attempts: i64,
    pub max_attempts: i64,
    pub last_error: Option<String>,
    pub sent_at: Option<i64>,
}

impl ScheduledEmailDTO {
    pub fn new(email: ScheduledEmail) -> Self {
        Self {
            id: email.id,
            user_id: email.user_id,
            rule_id: email.rule_id,
            template_id: email.template_id,
            scheduled_for: email.scheduled_for,
            status: email.status,
            attempts: email.attempts,
            max_attempts: email.max_attempts,
            last_error: email.last_error,
            sent_at: email.sent_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailBatchDTO {
    pub id: ID,
    pub template_id: ID,
    pub user_ids: Vec<ID>,
    pub status: EmailBatchStatus,
    pub total_emails: i64,
    pub sent_emails: i64,
    pub failed_emails: i64,
}

impl EmailBatchDTO {
    pub fn new(batch: EmailBatch) -> Self {
        Self {
            id: batch.id,
            template_id: batch.template_id,
            user_ids: batch.user_ids,
            status: batch.status,
            total_emails: batch.total_emails,
            sent_emails: batch.sent_emails,
            failed_emails: batch.failed_emails,
        }
    }
}
