use crate::config::SmtpConfig;
use anyhow::Context;
use lettre::message::{header::ContentType, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use mingle_notify_domain::RenderedEmail;
use std::sync::Mutex;
use tracing::info;

/// Outbound mail boundary. The only feedback the engine consumes is
/// success or failure of one delivery.
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn deliver(&self, recipient: &str, email: &RenderedEmail) -> anyhow::Result<()>;
}

/// Delivers over SMTP with lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, from: &str) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: from.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl IMailer for SmtpMailer {
    async fn deliver(&self, recipient: &str, email: &RenderedEmail) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.parse().context("Invalid sender address")?)
            .to(recipient.parse().context("Invalid recipient address")?)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html.clone()),
                    ),
            )?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Records deliveries instead of sending them. Used in development when no
/// SMTP settings are present and in tests, which can also inject failures
/// to drive the retry machinery.
pub struct InMemoryMailer {
    pub sent: Mutex<Vec<(String, RenderedEmail)>>,
    failures_remaining: Mutex<usize>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures_remaining: Mutex::new(0),
        }
    }

    /// The next `count` deliveries will fail with a transient error.
    pub fn fail_next(&self, count: usize) {
        *self.failures_remaining.lock().unwrap() = count;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    async fn deliver(&self, recipient: &str, email: &RenderedEmail) -> anyhow::Result<()> {
        {
            let mut failures = self.failures_remaining.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                anyhow::bail!("Injected delivery failure");
            }
        }
        info!("Recording email to {}: {}", recipient, email.subject);
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), email.clone()));
        Ok(())
    }
}
