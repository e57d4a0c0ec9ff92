use super::IAttendeeRepo;
use mingle_notify_domain::{Attendee, RsvpStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresAttendeeRepo {
    pool: PgPool,
}

impl PostgresAttendeeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AttendeeRaw {
    attendee_uid: Uuid,
    event_uid: Uuid,
    user_uid: Uuid,
    rsvp: String,
}

impl From<AttendeeRaw> for Attendee {
    fn from(raw: AttendeeRaw) -> Self {
        Self {
            id: raw.attendee_uid.into(),
            event_id: raw.event_uid.into(),
            user_id: raw.user_uid.into(),
            rsvp: raw.rsvp.parse().unwrap_or(RsvpStatus::Invited),
        }
    }
}

#[async_trait::async_trait]
impl IAttendeeRepo for PostgresAttendeeRepo {
    async fn insert(&self, attendee: &Attendee) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO event_attendees
            (attendee_uid, event_uid, user_uid, rsvp)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(attendee.id.inner_ref())
        .bind(attendee.event_id.inner_ref())
        .bind(attendee.user_id.inner_ref())
        .bind(attendee.rsvp.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, attendee: &Attendee) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE event_attendees SET rsvp = $2
            WHERE attendee_uid = $1
            "#,
        )
        .bind(attendee.id.inner_ref())
        .bind(attendee.rsvp.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<Attendee> {
        sqlx::query_as::<_, AttendeeRaw>(
            r#"
            SELECT * FROM event_attendees
            WHERE event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|_| Vec::new())
        .into_iter()
        .map(Into::into)
        .collect()
    }

    async fn find_by_event_and_user(&self, event_id: &ID, user_id: &ID) -> Option<Attendee> {
        sqlx::query_as::<_, AttendeeRaw>(
            r#"
            SELECT * FROM event_attendees
            WHERE event_uid = $1 AND user_uid = $2
            "#,
        )
        .bind(event_id.inner_ref())
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(Into::into)
    }
}
