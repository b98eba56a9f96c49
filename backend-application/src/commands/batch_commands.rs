use serde_json::{Map, Value};
use tracing::{info, warn};

use backend_domain::{flatten_batch, validate_batch, BatchResult, FailedLine};

use crate::ingest::{normalize_lines, persist_events};
use crate::{AppError, AppState};

pub const NO_VALID_RECORDS: &str = "No valid records to process";

/// Runs the bulk pipeline: flatten, normalize in parallel, validate the
/// batch schema, persist line by line. Lines dropped by the normalizer are
/// reported in `failed` next to persistence failures.
pub async fn create_events_batch(state: &AppState, payload: Value) -> Result<BatchResult, AppError> {
    let lines = flatten_batch(&payload)?;
    state.metrics.record_batch(lines.len());
    let submitted = lines.len();

    let normalized = normalize_lines(
        lines,
        state.config.worker_count,
        state.config.timestamp_offset,
    )
    .await?;

    if normalized.valid.is_empty() {
        warn!(submitted, "batch has no valid lines");
        state.metrics.record_outcome(0, normalized.rejected.len());
        let reasons = normalized
            .rejected
            .iter()
            .map(|rejected| rejected.reason())
            .collect::<Vec<_>>();
        let rejected = normalized
            .rejected
            .into_iter()
            .map(FailedLine::from)
            .collect::<Vec<_>>();
        let detail = if reasons.is_empty() {
            NO_VALID_RECORDS.to_string()
        } else {
            format!("{}: {}", NO_VALID_RECORDS, reasons.join("; "))
        };
        return Err(AppError::invalid(detail)
            .with_data(serde_json::to_value(rejected).unwrap_or(Value::Null)));
    }

    let records = normalized
        .valid
        .into_iter()
        .map(|line| line.fields)
        .collect::<Vec<Map<String, Value>>>();
    let events = match validate_batch(&records, state.config.timestamp_offset) {
        Ok(events) => events,
        Err(err) => {
            warn!("batch rejected by schema validation: {}", err);
            state
                .metrics
                .record_outcome(0, records.len() + normalized.rejected.len());
            let echoed = records.into_iter().map(Value::Object).collect::<Vec<_>>();
            return Err(AppError::from(err).with_data(Value::Array(echoed)));
        }
    };

    let mut result = persist_events(state.event_repo.as_ref(), events).await;
    for rejected in normalized.rejected {
        result.push_failed(rejected.into());
    }
    state
        .metrics
        .record_outcome(result.added_count, result.failed_count);
    info!(
        submitted,
        added = result.added_count,
        failed = result.failed_count,
        "batch processed"
    );
    Ok(result)
}
