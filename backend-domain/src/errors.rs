// Domain error taxonomy

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// A single field could not be parsed into its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid UUID: '{0}'")]
    Identifier(String),
    #[error("invalid datetime format: '{0}'")]
    Timestamp(String),
}

/// The batch payload does not have the expected nested shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("batch payload must be a JSON object")]
    PayloadNotObject,
    #[error("records must be a list")]
    RecordsNotList,
    #[error("record {index} must be an object")]
    RecordNotObject { index: usize },
    #[error("record {index} has no event list")]
    MissingEventList { index: usize },
    #[error("record {index} event {line} must be an object")]
    EventLineNotObject { index: usize, line: usize },
}

/// Field-level messages for one offending record, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Schema errors of one record inside a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordErrors {
    pub index: usize,
    #[serde(flatten)]
    pub fields: FieldErrors,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}")]
    Message(String),
    #[error("{} field(s) failed validation", .0.len())]
    Fields(FieldErrors),
    #[error("{} record(s) failed validation", .0.len())]
    Records(Vec<RecordErrors>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
