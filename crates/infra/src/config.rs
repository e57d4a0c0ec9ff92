use tracing::warn;

/// SMTP settings for the outbound mailer. Absent settings mean deliveries
/// are recorded in memory instead (development and tests).
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Sender address stamped on every outbound email.
    pub email_from: String,
    /// How often the delayed-send dispatcher scans for due emails.
    pub dispatch_interval_secs: u64,
    /// How long a `ScheduledEmail` may sit pending past its `scheduled_for`
    /// before it is expired instead of attempted. Bounds the backlog that
    /// can accumulate during an outage.
    pub pending_expiry_millis: i64,
    /// Default retry budget stamped on new `ScheduledEmail` records.
    pub max_send_attempts: i64,
    /// Base delay for the exponential retry backoff.
    pub retry_base_delay_minutes: i64,
    pub smtp: Option<SmtpConfig>,
}

fn env_i64(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Ok(value) => match value.parse::<i64>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let smtp = match (
            std::env::var("SMTP_HOST"),
            std::env::var("SMTP_USERNAME"),
            std::env::var("SMTP_PASSWORD"),
        ) {
            (Ok(host), Ok(username), Ok(password)) => Some(SmtpConfig {
                host,
                username,
                password,
            }),
            _ => None,
        };

        Self {
            port,
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Mingle <no-reply@mingle.app>".into()),
            dispatch_interval_secs: env_i64("EMAIL_DISPATCH_INTERVAL_SECS", 60).max(1) as u64,
            pending_expiry_millis: env_i64("SCHEDULED_EMAIL_EXPIRY_HOURS", 24).max(1)
                * 60
                * 60
                * 1000,
            max_send_attempts: env_i64("EMAIL_MAX_ATTEMPTS", 3).max(1),
            retry_base_delay_minutes: env_i64("EMAIL_RETRY_BACKOFF_MINUTES", 5).max(1),
            smtp,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
