// Identifier value objects

use uuid::Uuid;

use crate::errors::FormatError;

/// Parses a caller-supplied identifier. Any textual form the standard UUID
/// parser understands is accepted (hyphenated, simple, braced, urn).
pub fn parse_identifier(value: &str) -> Result<Uuid, FormatError> {
    Uuid::parse_str(value).map_err(|_| FormatError::Identifier(value.to_string()))
}
