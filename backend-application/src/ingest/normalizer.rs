use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use chrono::FixedOffset;
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use backend_domain::{normalize_timestamp, parse_identifier, FailedLine, FlatLine, FormatError};

pub const DEFAULT_WORKER_COUNT: usize = 5;

/// A flattened line dropped during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedLine {
    pub line: FlatLine,
    pub field: &'static str,
    pub error: FormatError,
}

impl RejectedLine {
    pub fn reason(&self) -> String {
        format!(
            "record {} line {}: {}: {}",
            self.line.record, self.line.line, self.field, self.error
        )
    }
}

impl From<RejectedLine> for FailedLine {
    fn from(rejected: RejectedLine) -> Self {
        let reason = rejected.reason();
        FailedLine {
            record: rejected.line.into_value(),
            reason,
        }
    }
}

#[derive(Debug)]
pub enum LineOutcome {
    Valid(FlatLine),
    Rejected(RejectedLine),
}

#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub valid: Vec<FlatLine>,
    pub rejected: Vec<RejectedLine>,
}

/// Canonicalizes `trans_id` and `trans_tms` of one line. Both must succeed
/// for the line to stay in the batch.
pub fn normalize_line(mut line: FlatLine, offset: FixedOffset) -> LineOutcome {
    let trans_id = match read_field(&line, "trans_id", FormatError::Identifier)
        .and_then(|raw| parse_identifier(&raw))
    {
        Ok(id) => id,
        Err(error) => return reject(line, "trans_id", error),
    };
    let trans_tms = match read_field(&line, "trans_tms", FormatError::Timestamp)
        .and_then(|raw| normalize_timestamp(&raw, offset))
    {
        Ok(ts) => ts,
        Err(error) => return reject(line, "trans_tms", error),
    };

    line.fields
        .insert("trans_id".to_string(), Value::String(trans_id.to_string()));
    line.fields
        .insert("trans_tms".to_string(), Value::String(trans_tms));
    LineOutcome::Valid(line)
}

/// Runs [`normalize_line`] over every line on the runtime, at most
/// `worker_count` at a time, and waits for all of them before returning.
pub async fn normalize_lines(
    lines: Vec<FlatLine>,
    worker_count: usize,
    offset: FixedOffset,
) -> anyhow::Result<NormalizedBatch> {
    let outcomes = run_bounded(lines, worker_count, move |line| async move {
        normalize_line(line, offset)
    })
    .await?;

    let mut batch = NormalizedBatch::default();
    for outcome in outcomes {
        match outcome {
            LineOutcome::Valid(line) => batch.valid.push(line),
            LineOutcome::Rejected(rejected) => batch.rejected.push(rejected),
        }
    }
    Ok(batch)
}

/// Forks one task per item, lets at most `worker_count` of them run `work`
/// at once, and joins them all. Results come back in submission order.
pub async fn run_bounded<T, R, F, Fut>(
    items: Vec<T>,
    worker_count: usize,
    work: F,
) -> anyhow::Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let permits = Arc::new(Semaphore::new(worker_count.max(1)));
    let work = Arc::new(work);
    let mut workers = JoinSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let permits = Arc::clone(&permits);
        let work = Arc::clone(&work);
        workers.spawn(async move {
            let _permit = permits.acquire_owned().await?;
            Ok::<_, tokio::sync::AcquireError>((index, work(item).await))
        });
    }

    let mut results = Vec::with_capacity(workers.len());
    while let Some(joined) = workers.join_next().await {
        let result = joined
            .context("normalizer worker failed")?
            .context("normalizer worker pool closed")?;
        results.push(result);
    }

    // Completion order is arbitrary.
    results.sort_unstable_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, result)| result).collect())
}

fn read_field(
    line: &FlatLine,
    field: &str,
    to_error: fn(String) -> FormatError,
) -> Result<String, FormatError> {
    match line.fields.get(field) {
        Some(Value::String(raw)) => Ok(raw.clone()),
        Some(other) => Err(to_error(other.to_string())),
        None => Err(to_error(String::new())),
    }
}

fn reject(line: FlatLine, field: &'static str, error: FormatError) -> LineOutcome {
    warn!(
        record = line.record,
        line = line.line,
        field,
        error = %error,
        "rejected batch line"
    );
    LineOutcome::Rejected(RejectedLine { line, field, error })
}
