use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Event, NewEvent};

/// Persistence port for the event table. Every call is a single-record unit
/// of work; adapters must not leave partially written rows behind.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn create(&self, event: NewEvent) -> anyhow::Result<Event>;
    async fn get_all(&self) -> anyhow::Result<Vec<Event>>;
    async fn get_by_id(&self, event_id: Uuid) -> anyhow::Result<Option<Event>>;
    /// Replaces every mutable field; `event_id` is kept.
    async fn update(&self, event_id: Uuid, event: NewEvent) -> anyhow::Result<Option<Event>>;
    async fn delete(&self, event_id: Uuid) -> anyhow::Result<Option<Event>>;
    async fn ping(&self) -> anyhow::Result<()>;
}
