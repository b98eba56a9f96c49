use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use serde_json::Value;

use backend_application::commands::{batch_commands, event_commands};
use backend_application::queries::event_queries;
use backend_application::AppState;
use backend_domain::{BatchResult, Event};

use crate::error::HttpError;
use crate::middleware::parse_json_body;
use crate::response::{batch_response, Envelope};

fn body_limit(state: &AppState) -> usize {
    usize::try_from(state.config.max_body_bytes).unwrap_or(usize::MAX)
}

pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Envelope<Value>, HttpError> {
    let payload = parse_json_body(&headers, &body, body_limit(&state))?;
    event_commands::create_event(&state, payload).await?;
    Ok(Envelope::ok(Value::Null))
}

pub async fn create_events_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Envelope<BatchResult>), HttpError> {
    let payload = parse_json_body(&headers, &body, body_limit(&state))?;
    let result = batch_commands::create_events_batch(&state, payload).await?;
    batch_response(result)
}

pub async fn get_events(State(state): State<AppState>) -> Result<Envelope<Vec<Event>>, HttpError> {
    let events = event_queries::list_events(&state).await?;
    Ok(Envelope::ok(events))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Envelope<Event>, HttpError> {
    let payload = parse_json_body(&headers, &body, body_limit(&state))?;
    let event = event_commands::update_event(&state, &event_id, payload).await?;
    Ok(Envelope::ok(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Envelope<Event>, HttpError> {
    let event = event_commands::delete_event(&state, &event_id).await?;
    Ok(Envelope::ok(event))
}
