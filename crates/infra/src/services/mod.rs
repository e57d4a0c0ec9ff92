mod mailer;

pub use mailer::{IMailer, InMemoryMailer, SmtpMailer};
