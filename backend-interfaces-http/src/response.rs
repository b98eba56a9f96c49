use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use backend_application::ErrorDetail;
use backend_domain::BatchResult;

use crate::error::HttpError;

pub const NO_RECORDS_ADDED: &str = "No records added";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub detail: ErrorDetail,
}

/// `{"error": ..., "data": ...}`, the body of every API response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub error: Option<ErrorBody>,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { error: None, data }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// A batch counts as a success as soon as one event was stored.
pub fn batch_response(result: BatchResult) -> Result<(StatusCode, Envelope<BatchResult>), HttpError> {
    if result.added_count == 0 {
        return Err(HttpError::Invalid {
            detail: ErrorDetail::Message(NO_RECORDS_ADDED.to_string()),
            data: Some(serde_json::to_value(&result).unwrap_or(Value::Null)),
        });
    }
    Ok((StatusCode::OK, Envelope::ok(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::FailedLine;

    #[test]
    fn empty_result_becomes_invalid() {
        let mut result = BatchResult::default();
        result.push_failed(FailedLine {
            record: Value::Null,
            reason: "store offline".to_string(),
        });
        match batch_response(result) {
            Err(HttpError::Invalid { detail, data }) => {
                assert_eq!(detail, ErrorDetail::Message(NO_RECORDS_ADDED.to_string()));
                let data = data.expect("result echoed");
                assert_eq!(data["failed_count"], 1);
                assert_eq!(data["added_count"], 0);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn envelope_serializes_null_error() {
        let body = serde_json::to_value(Envelope::ok(Value::Null)).unwrap();
        assert_eq!(body, serde_json::json!({"error": null, "data": null}));
    }
}
