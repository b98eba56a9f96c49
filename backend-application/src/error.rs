use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use backend_domain::{DomainError, FieldErrors, RecordErrors, ValidationError};

/// Human-readable message or structured field errors, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(FieldErrors),
    Records(Vec<RecordErrors>),
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDetail::Message(message) => f.write_str(message),
            ErrorDetail::Fields(fields) => {
                let names = fields.keys().map(String::as_str).collect::<Vec<_>>();
                write!(f, "invalid fields: {}", names.join(", "))
            }
            ErrorDetail::Records(records) => {
                write!(f, "{} record(s) failed validation", records.len())
            }
        }
    }
}

impl From<ValidationError> for ErrorDetail {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::Message(message) => ErrorDetail::Message(message),
            ValidationError::Fields(fields) => ErrorDetail::Fields(fields),
            ValidationError::Records(records) => ErrorDetail::Records(records),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid: {detail}")]
    Invalid {
        detail: ErrorDetail,
        data: Option<Value>,
    },
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::Invalid {
            detail: ErrorDetail::Message(message.into()),
            data: None,
        }
    }

    /// Attaches auxiliary data (e.g. the rejected records) to a validation error.
    pub fn with_data(self, value: Value) -> Self {
        match self {
            AppError::Invalid { detail, .. } => AppError::Invalid {
                detail,
                data: Some(value),
            },
            other => other,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        AppError::Invalid {
            detail: value.into(),
            data: None,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(err) => err.into(),
            DomainError::Structural(err) => AppError::invalid(err.to_string()),
            DomainError::Format(err) => AppError::invalid(err.to_string()),
        }
    }
}
