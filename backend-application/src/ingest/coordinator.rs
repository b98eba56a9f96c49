use serde_json::Value;
use tracing::{debug, error};

use backend_domain::ports::EventRepository;
use backend_domain::{BatchResult, FailedLine, NewEvent};

/// Persists each event as its own unit of work. A failing record is
/// recorded in `failed` and never stops or rolls back the others.
pub async fn persist_events(repo: &dyn EventRepository, events: Vec<NewEvent>) -> BatchResult {
    let mut result = BatchResult::default();
    for event in events {
        let record = serde_json::to_value(&event).unwrap_or(Value::Null);
        match repo.create(event).await {
            Ok(created) => {
                debug!(event_id = %created.event_id, "event persisted");
                result.push_added(created);
            }
            Err(err) => {
                error!("failed to persist event: {:#}", err);
                result.push_failed(FailedLine {
                    record,
                    reason: err.to_string(),
                });
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use backend_domain::{Event, LocationCode};
    use chrono::{FixedOffset, TimeZone};
    use uuid::Uuid;

    /// Stores everything except events whose `rc_num` is "reject".
    #[derive(Default)]
    struct PickyRepository {
        stored: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl EventRepository for PickyRepository {
        async fn ensure_schema(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn create(&self, event: NewEvent) -> anyhow::Result<Event> {
            if event.rc_num == "reject" {
                return Err(anyhow!("constraint violation on rc_num"));
            }
            let event = event.into_event(Uuid::new_v4());
            self.stored.lock().unwrap().push(event.clone());
            Ok(event)
        }

        async fn get_all(&self) -> anyhow::Result<Vec<Event>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn get_by_id(&self, _event_id: Uuid) -> anyhow::Result<Option<Event>> {
            Ok(None)
        }

        async fn update(&self, _event_id: Uuid, _event: NewEvent) -> anyhow::Result<Option<Event>> {
            Ok(None)
        }

        async fn delete(&self, _event_id: Uuid) -> anyhow::Result<Option<Event>> {
            Ok(None)
        }

        async fn ping(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

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
            location_cd: LocationCode::OutletId,
            location_id1: Some("I029".to_string()),
            location_id2: None,
            addr_nbr: None,
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_batch() {
        let repo = PickyRepository::default();
        let events = vec![new_event("10001"), new_event("reject"), new_event("10003")];

        let result = persist_events(&repo, events).await;
        assert_eq!(result.added_count, 2);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.total(), 3);
        assert_eq!(result.failed[0].record["rc_num"], "reject");
        assert!(result.failed[0].reason.contains("constraint violation"));

        let stored = repo.get_all().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|event| event.rc_num != "reject"));
        assert_eq!(stored, result.added);
    }

    #[tokio::test]
    async fn all_failures_are_reported() {
        let repo = PickyRepository::default();
        let result = persist_events(&repo, vec![new_event("reject"), new_event("reject")]).await;
        assert_eq!(result.added_count, 0);
        assert_eq!(result.failed_count, 2);
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
