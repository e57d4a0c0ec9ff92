use crate::email_event::EmailEventPayload;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledEmailStatus {
    Pending,
    Processing,
    Sent,
    Failed,
    Cancelled,
    Expired,
}

impl ScheduledEmailStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Sent | Self::Failed | Self::Cancelled | Self::Expired
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl Display for ScheduledEmailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid scheduled email status: {0}")]
pub struct InvalidStatusError(String);

impl FromStr for ScheduledEmailStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            _ => Err(InvalidStatusError(s.to_string())),
        }
    }
}

/// A queued, time-stamped unit of outbound email work with bounded retry.
/// Materialized when an `EmailRule` matches an `EmailEvent`; the dispatcher
/// drives it through the status state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEmail {
    pub id: ID,
    pub user_id: ID,
    pub rule_id: ID,
    pub template_id: ID,
    pub payload: EmailEventPayload,
    pub scheduled_for: i64,
    pub status: ScheduledEmailStatus,
    pub attempts: i64,
    pub max_attempts: i64,
    pub last_error: Option<String>,
    pub sent_at: Option<i64>,
    pub created: i64,
}

impl ScheduledEmail {
    pub fn is_due(&self, now: i64) -> bool {
        self.status == ScheduledEmailStatus::Pending && self.scheduled_for <= now
    }

    pub fn mark_sent(&mut self, now: i64) {
        self.status = ScheduledEmailStatus::Sent;
        self.sent_at = Some(now);
        self.last_error = None;
    }

    /// Records one failed delivery attempt. Reverts to `pending` with the
    /// given retry timestamp while attempts remain, otherwise `failed`.
    /// `attempts` never exceeds `max_attempts`.
    pub fn record_failure(&mut self, error: &str, retry_at: i64) {
        self.attempts = (self.attempts + 1).min(self.max_attempts);
        self.last_error = Some(error.to_string());
        if self.attempts < self.max_attempts {
            self.status = ScheduledEmailStatus::Pending;
            self.scheduled_for = retry_at;
        } else {
            self.status = ScheduledEmailStatus::Failed;
        }
    }

    /// Permanent failure without retry, for records whose user, email
    /// address or template is gone at dispatch time.
    pub fn abandon(&mut self, error: &str) {
        self.status = ScheduledEmailStatus::Failed;
        self.last_error = Some(error.to_string());
    }
}

impl Entity for ScheduledEmail {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Exponential retry backoff: the base delay doubles with every recorded
/// attempt, capped at `max_delay_minutes`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub base_delay_minutes: i64,
    pub max_delay_minutes: i64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_minutes: 5,
            max_delay_minutes: 60,
        }
    }
}

impl RetryPolicy {
    /// Delay in millis before the next try, given the number of attempts
    /// already recorded (1-indexed: pass 1 after the first failure).
    pub fn delay_millis(&self, attempts: i64) -> i64 {
        let exponent = (attempts - 1).max(0).min(16) as u32;
        let minutes = self
            .base_delay_minutes
            .saturating_mul(1_i64 << exponent)
            .min(self.max_delay_minutes);
        minutes * 60 * 1000
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::email_event::EmailEventPayload;

    fn scheduled_email(max_attempts: i64) -> ScheduledEmail {
        ScheduledEmail {
            id: Default::default(),
            user_id: Default::default(),
            rule_id: Default::default(),
            template_id: Default::default(),
            payload: EmailEventPayload::EventCancelled {
                event_id: Default::default(),
                event_name: "Rust Meetup".into(),
                start_ts: 0,
            },
            scheduled_for: 1000,
            status: ScheduledEmailStatus::Pending,
            attempts: 0,
            max_attempts,
            last_error: None,
            sent_at: None,
            created: 0,
        }
    }

    #[test]
    fn due_only_when_pending_and_past_schedule() {
        let mut email = scheduled_email(3);
        assert!(!email.is_due(999));
        assert!(email.is_due(1000));

        email.status = ScheduledEmailStatus::Processing;
        assert!(!email.is_due(2000));
    }

    #[test]
    fn failures_retry_until_max_attempts() {
        let mut email = scheduled_email(3);

        email.record_failure("connection refused", 5000);
        assert_eq!(email.status, ScheduledEmailStatus::Pending);
        assert_eq!(email.attempts, 1);
        assert_eq!(email.scheduled_for, 5000);

        email.record_failure("connection refused", 9000);
        assert_eq!(email.status, ScheduledEmailStatus::Pending);
        assert_eq!(email.attempts, 2);

        email.record_failure("connection refused", 13000);
        assert_eq!(email.status, ScheduledEmailStatus::Failed);
        assert_eq!(email.attempts, 3);
        assert!(email.status.is_terminal());

        // A stray extra failure never pushes attempts past the bound.
        email.record_failure("connection refused", 17000);
        assert_eq!(email.attempts, 3);
    }

    #[test]
    fn sent_is_terminal_and_clears_error() {
        let mut email = scheduled_email(3);
        email.record_failure("greylisted", 5000);
        email.mark_sent(6000);
        assert_eq!(email.status, ScheduledEmailStatus::Sent);
        assert_eq!(email.sent_at, Some(6000));
        assert_eq!(email.last_error, None);
        assert!(email.status.is_terminal());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            base_delay_minutes: 5,
            max_delay_minutes: 60,
        };
        assert_eq!(policy.delay_millis(1), 5 * 60 * 1000);
        assert_eq!(policy.delay_millis(2), 10 * 60 * 1000);
        assert_eq!(policy.delay_millis(3), 20 * 60 * 1000);
        assert_eq!(policy.delay_millis(5), 60 * 60 * 1000);
        assert_eq!(policy.delay_millis(12), 60 * 60 * 1000);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ScheduledEmailStatus::Pending,
            ScheduledEmailStatus::Processing,
            ScheduledEmailStatus::Sent,
            ScheduledEmailStatus::Failed,
            ScheduledEmailStatus::Cancelled,
            ScheduledEmailStatus::Expired,
        ] {
            assert_eq!(status.as_str().parse::<ScheduledEmailStatus>().unwrap(), status);
        }
        assert!("unknown".parse::<ScheduledEmailStatus>().is_err());
    }
}
