mod calendar;
mod email;
mod event;
mod shared;
mod user;

use calendar::{ICalendarRepo, InMemoryCalendarRepo, PostgresCalendarRepo};
use email::{
    IEmailBatchRepo, IEmailEventRepo, IEmailRuleRepo, IEmailTemplateRepo, IScheduledEmailRepo,
    InMemoryEmailBatchRepo, InMemoryEmailEventRepo, InMemoryEmailRuleRepo,
    InMemoryEmailTemplateRepo, InMemoryScheduledEmailRepo, PostgresEmailBatchRepo,
    PostgresEmailEventRepo, PostgresEmailRuleRepo, PostgresEmailTemplateRepo,
    PostgresScheduledEmailRepo,
};
use event::{
    IAttendeeRepo, IEventRepo, InMemoryAttendeeRepo, InMemoryEventRepo, PostgresAttendeeRepo,
    PostgresEventRepo,
};
use sqlx::PgPool;
use std::sync::Arc;
use user::{IUserRepo, InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn IUserRepo>,
    pub calendars: Arc<dyn ICalendarRepo>,
    pub events: Arc<dyn IEventRepo>,
    pub attendees: Arc<dyn IAttendeeRepo>,
    pub email_events: Arc<dyn IEmailEventRepo>,
    pub email_rules: Arc<dyn IEmailRuleRepo>,
    pub email_templates: Arc<dyn IEmailTemplateRepo>,
    pub scheduled_emails: Arc<dyn IScheduledEmailRepo>,
    pub email_batches: Arc<dyn IEmailBatchRepo>,
}

impl Repos {
    pub fn create_postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            calendars: Arc::new(PostgresCalendarRepo::new(pool.clone())),
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            attendees: Arc::new(PostgresAttendeeRepo::new(pool.clone())),
            email_events: Arc::new(PostgresEmailEventRepo::new(pool.clone())),
            email_rules: Arc::new(PostgresEmailRuleRepo::new(pool.clone())),
            email_templates: Arc::new(PostgresEmailTemplateRepo::new(pool.clone())),
            scheduled_emails: Arc::new(PostgresScheduledEmailRepo::new(pool.clone())),
            email_batches: Arc::new(PostgresEmailBatchRepo::new(pool)),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepo::new()),
            calendars: Arc::new(InMemoryCalendarRepo::new()),
            events: Arc::new(InMemoryEventRepo::new()),
            attendees: Arc::new(InMemoryAttendeeRepo::new()),
            email_events: Arc::new(InMemoryEmailEventRepo::new()),
            email_rules: Arc::new(InMemoryEmailRuleRepo::new()),
            email_templates: Arc::new(InMemoryEmailTemplateRepo::new()),
            scheduled_emails: Arc::new(InMemoryScheduledEmailRepo::new()),
            email_batches: Arc::new(InMemoryEmailBatchRepo::new()),
        }
    }
}
