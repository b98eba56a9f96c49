use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use backend_domain::ports::EventRepository;
use backend_domain::{Event, NewEvent};

/// Process-local store, kept in insertion order.
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<Vec<Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn create(&self, event: NewEvent) -> Result<Event> {
        let event = event.into_event(Uuid::new_v4());
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn get_all(&self) -> Result<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn get_by_id(&self, event_id: Uuid) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|event| event.event_id == event_id).cloned())
    }

    async fn update(&self, event_id: Uuid, event: NewEvent) -> Result<Option<Event>> {
        let mut events = self.events.write().await;
        let Some(slot) = events.iter_mut().find(|stored| stored.event_id == event_id) else {
            return Ok(None);
        };
        *slot = event.into_event(event_id);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, event_id: Uuid) -> Result<Option<Event>> {
        let mut events = self.events.write().await;
        let position = events.iter().position(|event| event.event_id == event_id);
        Ok(position.map(|index| events.remove(index)))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::LocationCode;
    use chrono::{FixedOffset, TimeZone};

    fn new_event(rc_num: &str) -> NewEvent {
        NewEvent {
            trans_id: Uuid::new_v4(),
            trans_tms: FixedOffset::east_opt(19_800)
                .unwrap()
                .with_ymd_and_hms(2024, 9, 14, 10, 20, 30)
                .unwrap(),
            rc_num: rc_num.to_string(),
            client_id: "RPS-00001".to_string(),
            event_cnt: 1,
            location_cd: LocationCode::Destination,
            location_id1: Some("I029".to_string()),
            location_id2: None,
            addr_nbr: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids_and_keeps_order() {
        let repo = InMemoryEventRepository::new();
        let first = repo.create(new_event("10001")).await.unwrap();
        let second = repo.create(new_event("10002")).await.unwrap();
        assert_ne!(first.event_id, second.event_id);

        let all = repo.get_all().await.unwrap();
        assert_eq!(all, vec![first.clone(), second]);
        assert_eq!(repo.get_by_id(first.event_id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn update_replaces_fields_but_keeps_id() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(new_event("10001")).await.unwrap();

        let mut replacement = new_event("20002");
        replacement.event_cnt = 4;
        let updated = repo
            .update(created.event_id, replacement)
            .await
            .unwrap()
            .expect("present");
        assert_eq!(updated.event_id, created.event_id);
        assert_eq!(updated.rc_num, "20002");
        assert_eq!(updated.event_cnt, 4);
        assert_eq!(repo.get_all().await.unwrap(), vec![updated]);

        let missing = repo.update(Uuid::new_v4(), new_event("x")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn delete_returns_removed_event_once() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(new_event("10001")).await.unwrap();

        let removed = repo.delete(created.event_id).await.unwrap();
        assert_eq!(removed, Some(created.clone()));
        assert!(repo.delete(created.event_id).await.unwrap().is_none());
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
