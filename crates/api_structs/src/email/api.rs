use crate::dtos::{EmailBatchDTO, EmailEventDTO, EmailRuleDTO, EmailTemplateDTO, ScheduledEmailDTO};
use mingle_notify_domain::{
    EmailBatch, EmailEvent, EmailEventPayload, EmailRule, EmailTemplate, EventType,
    RuleConditions, ScheduledEmail, TemplateCategory, ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRuleResponse {
    pub rule: EmailRuleDTO,
}

impl EmailRuleResponse {
    pub fn new(rule: EmailRule) -> Self {
        Self {
            rule: EmailRuleDTO::new(rule),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplateResponse {
    pub template: EmailTemplateDTO,
}

impl EmailTemplateResponse {
    pub fn new(template: EmailTemplate) -> Self {
        Self {
            template: EmailTemplateDTO::new(template),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailBatchResponse {
    pub batch: EmailBatchDTO,
}

impl EmailBatchResponse {
    pub fn new(batch: EmailBatch) -> Self {
        Self {
            batch: EmailBatchDTO::new(batch),
        }
    }
}

pub mod trigger_email_event {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: ID,
        /// Tagged payload; the `type` field is the `EventType`.
        pub payload: EmailEventPayload,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub email_event: EmailEventDTO,
        pub scheduled_emails: Vec<ScheduledEmailDTO>,
    }

    impl APIResponse {
        pub fn new(event: EmailEvent, scheduled: Vec<ScheduledEmail>) -> Self {
            Self {
                email_event: EmailEventDTO::new(event),
                scheduled_emails: scheduled.into_iter().map(ScheduledEmailDTO::new).collect(),
            }
        }
    }
}

pub mod create_rule {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        pub trigger: EventType,
        pub template_id: ID,
        #[serde(default)]
        pub conditions: Option<RuleConditions>,
        pub delay_minutes: Option<i64>,
        pub priority: Option<i64>,
    }

    pub type APIResponse = EmailRuleResponse;
}

pub mod update_rule {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub rule_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub active: Option<bool>,
        pub conditions: Option<RuleConditions>,
        pub delay_minutes: Option<i64>,
        pub priority: Option<i64>,
    }

    pub type APIResponse = EmailRuleResponse;
}

pub mod get_rules {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub rules: Vec<EmailRuleDTO>,
    }

    impl APIResponse {
        pub fn new(rules: Vec<EmailRule>) -> Self {
            Self {
                rules: rules.into_iter().map(EmailRuleDTO::new).collect(),
            }
        }
    }
}

pub mod create_template {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        pub category: TemplateCategory,
        pub subject: String,
        pub html_body: String,
        pub text_body: String,
        pub variables: Vec<String>,
    }

    pub type APIResponse = EmailTemplateResponse;
}

pub mod get_template {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub template_id: ID,
    }

    pub type APIResponse = EmailTemplateResponse;
}

pub mod update_template {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub template_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub subject: Option<String>,
        pub html_body: Option<String>,
        pub text_body: Option<String>,
        pub variables: Option<Vec<String>>,
    }

    pub type APIResponse = EmailTemplateResponse;
}

pub mod get_scheduled_emails {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub scheduled_emails: Vec<ScheduledEmailDTO>,
    }

    impl APIResponse {
        pub fn new(emails: Vec<ScheduledEmail>) -> Self {
            Self {
                scheduled_emails: emails.into_iter().map(ScheduledEmailDTO::new).collect(),
            }
        }
    }
}

pub mod cancel_scheduled_email {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub scheduled_email_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub scheduled_email: ScheduledEmailDTO,
    }

    impl APIResponse {
        pub fn new(email: ScheduledEmail) -> Self {
            Self {
                scheduled_email: ScheduledEmailDTO::new(email),
            }
        }
    }
}

pub mod process_due_emails {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub sent: usize,
        pub retried: usize,
        pub failed: usize,
        pub expired: usize,
    }
}

pub mod create_batch {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub template_id: ID,
        pub user_ids: Vec<ID>,
    }

    pub type APIResponse = EmailBatchResponse;
}

pub mod schedule_batch {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub batch_id: ID,
    }

    pub type APIResponse = EmailBatchResponse;
}

pub mod process_batch {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub batch_id: ID,
    }

    pub type APIResponse = EmailBatchResponse;
}

pub mod get_batch {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub batch_id: ID,
    }

    pub type APIResponse = EmailBatchResponse;
}
