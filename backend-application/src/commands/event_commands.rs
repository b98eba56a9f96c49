use anyhow::anyhow;
use serde_json::{Map, Value};
use tracing::{error, info};
use uuid::Uuid;

use backend_domain::{parse_identifier, validate_record, Event, ValidationError, NO_DATA_FOUND};

use crate::{AppError, AppState};

pub const INVALID_TRANS_ID: &str = "Invalid Transaction ID format";
pub const INVALID_EVENT_ID: &str = "Invalid ID format";
pub const EVENT_NOT_FOUND: &str = "Event not found";

const EVENT_ID_FIELD: &str = "event_id";

pub async fn create_event(state: &AppState, payload: Value) -> Result<Event, AppError> {
    let fields = non_empty_object(payload)?;
    check_trans_id(&fields)?;
    let event = validate_record(&fields, state.config.timestamp_offset)
        .map_err(ValidationError::Fields)?;

    let created = state.event_repo.create(event).await.map_err(|err| {
        error!("failed to create event: {:#}", err);
        AppError::Internal(err)
    })?;
    info!(event_id = %created.event_id, "event created");
    Ok(created)
}

/// Overlays `payload` on the stored event and re-validates the result.
pub async fn update_event(
    state: &AppState,
    raw_event_id: &str,
    payload: Value,
) -> Result<Event, AppError> {
    let event_id = parse_event_id(raw_event_id)?;
    let existing = state
        .event_repo
        .get_by_id(event_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(EVENT_NOT_FOUND.to_string()))?;

    let changes = non_empty_object(payload)?;
    check_trans_id(&changes)?;

    let mut merged = match serde_json::to_value(&existing) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => return Err(AppError::Internal(anyhow!("stored event is not an object"))),
        Err(err) => return Err(AppError::Internal(err.into())),
    };
    merged.extend(changes);
    merged.remove(EVENT_ID_FIELD);

    let event = validate_record(&merged, state.config.timestamp_offset)
        .map_err(ValidationError::Fields)?;
    let updated = state
        .event_repo
        .update(event_id, event)
        .await
        .map_err(|err| {
            error!(%event_id, "failed to update event: {:#}", err);
            AppError::Internal(err)
        })?
        .ok_or_else(|| AppError::NotFound(EVENT_NOT_FOUND.to_string()))?;
    info!(%event_id, "event updated");
    Ok(updated)
}

pub async fn delete_event(state: &AppState, raw_event_id: &str) -> Result<Event, AppError> {
    let event_id = parse_event_id(raw_event_id)?;
    let deleted = state
        .event_repo
        .delete(event_id)
        .await
        .map_err(|err| {
            error!(%event_id, "failed to delete event: {:#}", err);
            AppError::Internal(err)
        })?
        .ok_or_else(|| AppError::NotFound(EVENT_NOT_FOUND.to_string()))?;
    info!(%event_id, "event deleted");
    Ok(deleted)
}

fn parse_event_id(raw: &str) -> Result<Uuid, AppError> {
    parse_identifier(raw).map_err(|_| AppError::invalid(INVALID_EVENT_ID))
}

fn non_empty_object(payload: Value) -> Result<Map<String, Value>, AppError> {
    match payload {
        Value::Object(fields) if !fields.is_empty() => Ok(fields),
        _ => Err(AppError::invalid(NO_DATA_FOUND)),
    }
}

/// A malformed `trans_id` gets its own message instead of a field error.
fn check_trans_id(fields: &Map<String, Value>) -> Result<(), AppError> {
    match fields.get("trans_id") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(raw)) if parse_identifier(raw.trim()).is_ok() => Ok(()),
        Some(_) => Err(AppError::invalid(INVALID_TRANS_ID)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trans_id_check_only_rejects_present_bad_values() {
        let mut fields = Map::new();
        assert!(check_trans_id(&fields).is_ok());
        fields.insert("trans_id".to_string(), Value::String("67e55044-10b1-426f-9247-bb680e5fe0c8".into()));
        assert!(check_trans_id(&fields).is_ok());
        fields.insert("trans_id".to_string(), Value::String("not-a-uuid".into()));
        assert!(matches!(check_trans_id(&fields), Err(AppError::Invalid { .. })));
        fields.insert("trans_id".to_string(), Value::from(7));
        assert!(matches!(check_trans_id(&fields), Err(AppError::Invalid { .. })));
    }

    #[test]
    fn empty_payloads_are_rejected() {
        for payload in [Value::Null, Value::Object(Map::new()), Value::from("text")] {
            let err = non_empty_object(payload).expect_err("reject");
            assert_eq!(err.to_string(), format!("invalid: {}", NO_DATA_FOUND));
        }
    }

    #[test]
    fn event_id_must_be_a_uuid() {
        assert!(parse_event_id("67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
        let err = parse_event_id("42").expect_err("reject");
        assert_eq!(err.to_string(), format!("invalid: {}", INVALID_EVENT_ID));
    }
}
