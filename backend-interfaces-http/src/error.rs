use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use backend_application::{AppError, ErrorDetail};

use crate::response::{Envelope, ErrorBody};

pub const CODE_INVALID: &str = "invalid";
pub const CODE_NOT_FOUND: &str = "not-found";
pub const CODE_INTERNAL: &str = "internal-server-error";

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid: {detail}")]
    Invalid {
        detail: ErrorDetail,
        data: Option<Value>,
    },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl HttpError {
    pub fn invalid(message: impl Into<String>) -> Self {
        HttpError::Invalid {
            detail: ErrorDetail::Message(message.into()),
            data: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Invalid { .. } | HttpError::NotFound(_) => StatusCode::BAD_REQUEST,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Invalid { detail, data } => HttpError::Invalid { detail, data },
            AppError::NotFound(message) => HttpError::NotFound(message),
            AppError::Internal(err) => HttpError::Internal(format!("{:#}", err)),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, detail, data) = match self {
            HttpError::Invalid { detail, data } => (CODE_INVALID, detail, data),
            HttpError::NotFound(message) => (CODE_NOT_FOUND, ErrorDetail::Message(message), None),
            HttpError::Internal(message) => {
                error!("request failed: {}", message);
                (CODE_INTERNAL, ErrorDetail::Message(message), None)
            }
        };
        let body = Envelope {
            error: Some(ErrorBody { code, detail }),
            data: data.unwrap_or(Value::Null),
        };
        (status, body).into_response()
    }
}
