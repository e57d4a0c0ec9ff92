use super::IEventRepo;
use mingle_notify_domain::{CalendarEvent, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_uid: Uuid,
    calendar_uid: Uuid,
    host_uid: Uuid,
    name: String,
    start_ts: i64,
    end_ts: i64,
    location: Option<String>,
    virtual_link: Option<String>,
    is_public: bool,
    capacity: Option<i64>,
    created: i64,
    updated: i64,
}

impl From<EventRaw> for CalendarEvent {
    fn from(raw: EventRaw) -> Self {
        Self {
            id: raw.event_uid.into(),
            calendar_id: raw.calendar_uid.into(),
            host_user_id: raw.host_uid.into(),
            name: raw.name,
            start_ts: raw.start_ts,
            end_ts: raw.end_ts,
            location: raw.location,
            virtual_link: raw.virtual_link,
            is_public: raw.is_public,
            capacity: raw.capacity,
            created: raw.created,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, event: &CalendarEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO calendar_events
            (event_uid, calendar_uid, host_uid, name, start_ts, end_ts, location, virtual_link, is_public, capacity, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(event.id.inner_ref())
        .bind(event.calendar_id.inner_ref())
        .bind(event.host_user_id.inner_ref())
        .bind(&event.name)
        .bind(event.start_ts)
        .bind(event.end_ts)
        .bind(&event.location)
        .bind(&event.virtual_link)
        .bind(event.is_public)
        .bind(event.capacity)
        .bind(event.created)
        .bind(event.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<CalendarEvent> {
        sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM calendar_events
            WHERE event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(Into::into)
    }
}
