use super::IAttendeeRepo;
use crate::repos::shared::inmemory_repo::*;
use mingle_notify_domain::{Attendee, ID};

pub struct InMemoryAttendeeRepo {
    attendees: std::sync::Mutex<Vec<Attendee>>,
}

impl InMemoryAttendeeRepo {
    pub fn new() -> Self {
        Self {
            attendees: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IAttendeeRepo for InMemoryAttendeeRepo {
    async fn insert(&self, attendee: &Attendee) -> anyhow::Result<()> {
        insert(attendee, &self.attendees);
        Ok(())
    }

    async fn save(&self, attendee: &Attendee) -> anyhow::Result<()> {
        save(attendee, &self.attendees);
        Ok(())
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<Attendee> {
        find_by(&self.attendees, |a| a.event_id == *event_id)
    }

    async fn find_by_event_and_user(&self, event_id: &ID, user_id: &ID) -> Option<Attendee> {
        find_by(&self.attendees, |a| {
            a.event_id == *event_id && a.user_id == *user_id
        })
        .into_iter()
        .next()
    }
}
