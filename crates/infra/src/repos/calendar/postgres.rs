use super::ICalendarRepo;
use mingle_notify_domain::{Calendar, ID};
use sqlx::{types::Json, types::Uuid, FromRow, PgPool};

pub struct PostgresCalendarRepo {
    pool: PgPool,
}

impl PostgresCalendarRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CalendarRaw {
    calendar_uid: Uuid,
    owner_uid: Uuid,
    name: String,
    members: Json<Vec<ID>>,
}

impl From<CalendarRaw> for Calendar {
    fn from(raw: CalendarRaw) -> Self {
        Self {
            id: raw.calendar_uid.into(),
            owner_user_id: raw.owner_uid.into(),
            name: raw.name,
            members: raw.members.0,
        }
    }
}

#[async_trait::async_trait]
impl ICalendarRepo for PostgresCalendarRepo {
    async fn insert(&self, calendar: &Calendar) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO calendars
            (calendar_uid, owner_uid, name, members)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(calendar.id.inner_ref())
        .bind(calendar.owner_user_id.inner_ref())
        .bind(&calendar.name)
        .bind(Json(&calendar.members))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, calendar: &Calendar) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE calendars SET
                owner_uid = $2,
                name = $3,
                members = $4
            WHERE calendar_uid = $1
            "#,
        )
        .bind(calendar.id.inner_ref())
        .bind(calendar.owner_user_id.inner_ref())
        .bind(&calendar.name)
        .bind(Json(&calendar.members))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, calendar_id: &ID) -> Option<Calendar> {
        sqlx::query_as::<_, CalendarRaw>(
            r#"
            SELECT * FROM calendars
            WHERE calendar_uid = $1
            "#,
        )
        .bind(calendar_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(Into::into)
    }
}
