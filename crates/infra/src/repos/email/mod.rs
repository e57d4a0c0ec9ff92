mod batch;
mod event;
mod rule;
mod scheduled;
mod template;

pub use batch::{IEmailBatchRepo, InMemoryEmailBatchRepo, PostgresEmailBatchRepo};
pub use event::{IEmailEventRepo, InMemoryEmailEventRepo, PostgresEmailEventRepo};
pub use rule::{IEmailRuleRepo, InMemoryEmailRuleRepo, PostgresEmailRuleRepo};
pub use scheduled::{
    IScheduledEmailRepo, InMemoryScheduledEmailRepo, PostgresScheduledEmailRepo,
};
pub use template::{IEmailTemplateRepo, InMemoryEmailTemplateRepo, PostgresEmailTemplateRepo};
