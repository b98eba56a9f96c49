use tracing::error;

use backend_domain::Event;

use crate::{AppError, AppState};

pub async fn list_events(state: &AppState) -> Result<Vec<Event>, AppError> {
    let events = state.event_repo.get_all().await.map_err(|err| {
        error!("failed to fetch events: {}", err);
        AppError::Internal(err)
    })?;
    Ok(events)
}
