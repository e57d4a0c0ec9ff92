use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailBatchStatus {
    Draft,
    Scheduled,
    Processing,
    Completed,
}

impl EmailBatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

impl Display for EmailBatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid email batch status: {0}")]
pub struct InvalidBatchStatusError(String);

impl FromStr for EmailBatchStatus {
    type Err = InvalidBatchStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "scheduled" => Ok(Self::Scheduled),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            _ => Err(InvalidBatchStatusError(s.to_string())),
        }
    }
}

/// A bulk send of one template to many users. Progresses
/// draft → scheduled → processing → completed; recipients without an email
/// address count in neither `sent_emails` nor `failed_emails`, so
/// `sent_emails + failed_emails <= total_emails` holds throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailBatch {
    pub id: ID,
    pub template_id: ID,
    pub user_ids: Vec<ID>,
    pub status: EmailBatchStatus,
    pub total_emails: i64,
    pub sent_emails: i64,
    pub failed_emails: i64,
    pub created: i64,
}

impl EmailBatch {
    pub fn new(template_id: &ID, user_ids: Vec<ID>, created: i64) -> Self {
        let total_emails = user_ids.len() as i64;
        Self {
            id: Default::default(),
            template_id: template_id.clone(),
            user_ids,
            status: EmailBatchStatus::Draft,
            total_emails,
            sent_emails: 0,
            failed_emails: 0,
            created,
        }
    }

    pub fn record_sent(&mut self) {
        if self.sent_emails + self.failed_emails < self.total_emails {
            self.sent_emails += 1;
        }
    }

    pub fn record_failed(&mut self) {
        if self.sent_emails + self.failed_emails < self.total_emails {
            self.failed_emails += 1;
        }
    }
}

impl Entity for EmailBatch {
    fn id(&self) -> &ID {
        &self.id
    }
}
