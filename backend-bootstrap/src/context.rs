use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use backend_application::AppState;
use backend_domain::ports::EventRepository;
use backend_domain::{DbConfig, StorageBackend};
use backend_infrastructure::{AppConfig, ClickhouseEventRepository, InMemoryEventRepository};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config()?;
        let db_config = config.to_db_config();

        let event_repo = build_event_repository(&db_config);
        event_repo.ensure_schema().await?;
        info!(
            storage = ?db_config.storage,
            workers = runtime_config.worker_count,
            offset = %runtime_config.timestamp_offset,
            "event store ready"
        );

        Ok(Self {
            state: AppState::new(runtime_config, event_repo),
        })
    }
}

fn build_event_repository(db_config: &DbConfig) -> Arc<dyn EventRepository> {
    match db_config.storage {
        StorageBackend::Memory => Arc::new(InMemoryEventRepository::new()),
        StorageBackend::Clickhouse => Arc::new(ClickhouseEventRepository::from_config(db_config)),
    }
}
