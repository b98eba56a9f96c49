// Structural and type validation of event records

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::entities::NewEvent;
use crate::errors::{FieldErrors, RecordErrors, ValidationError};
use crate::value_objects::{parse_event_timestamp, parse_identifier, LocationCode};

pub const RC_NUM_MAX_LEN: usize = 100;
pub const CLIENT_ID_MAX_LEN: usize = 100;
pub const SHORT_FIELD_MAX_LEN: usize = 50;
pub const DEFAULT_EVENT_CNT: i32 = 1;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_NULL: &str = "This field may not be null.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_NOT_STRING: &str = "Not a valid string.";
pub const MSG_INVALID_INTEGER: &str = "A valid integer is required.";
pub const MSG_INVALID_UUID: &str = "Must be a valid UUID.";
pub const MSG_INVALID_DATETIME: &str = "Datetime has wrong format.";

/// Validates a whole batch. Every offending record is reported, not just
/// the first one; a single failure rejects the batch.
pub fn validate_batch(
    records: &[Map<String, Value>],
    offset: FixedOffset,
) -> Result<Vec<NewEvent>, ValidationError> {
    let mut events = Vec::with_capacity(records.len());
    let mut failures = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match validate_record(record, offset) {
            Ok(event) => events.push(event),
            Err(fields) => failures.push(RecordErrors { index, fields }),
        }
    }
    if failures.is_empty() {
        Ok(events)
    } else {
        Err(ValidationError::Records(failures))
    }
}

/// Validates one flat record. Unknown keys are ignored.
pub fn validate_record(
    fields: &Map<String, Value>,
    offset: FixedOffset,
) -> Result<NewEvent, FieldErrors> {
    let mut checker = Checker {
        fields,
        errors: FieldErrors::new(),
    };

    let trans_id = checker.trans_id();
    let trans_tms = checker.trans_tms(offset);
    let rc_num = checker.required_string("rc_num", RC_NUM_MAX_LEN);
    let client_id = checker.required_string("client_id", CLIENT_ID_MAX_LEN);
    let event_cnt = checker.event_cnt();
    let location_cd = checker.location_cd();
    let location_id1 = checker.optional_string("location_id1", SHORT_FIELD_MAX_LEN);
    let location_id2 = checker.optional_string("location_id2", SHORT_FIELD_MAX_LEN);
    let addr_nbr = checker.optional_string("addr_nbr", SHORT_FIELD_MAX_LEN);

    // Every `None` below has recorded at least one message.
    let (
        Some(trans_id),
        Some(trans_tms),
        Some(rc_num),
        Some(client_id),
        Some(event_cnt),
        Some(location_cd),
        Some(location_id1),
        Some(location_id2),
        Some(addr_nbr),
    ) = (
        trans_id,
        trans_tms,
        rc_num,
        client_id,
        event_cnt,
        location_cd,
        location_id1,
        location_id2,
        addr_nbr,
    )
    else {
        return Err(checker.errors);
    };

    Ok(NewEvent {
        trans_id,
        trans_tms,
        rc_num,
        client_id,
        event_cnt,
        location_cd,
        location_id1,
        location_id2,
        addr_nbr,
    })
}

struct Checker<'a> {
    fields: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl Checker<'_> {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Coerces scalars the way the API has always accepted them: strings are
    /// trimmed, numbers are rendered as text.
    fn text(&mut self, field: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(raw) => Some(raw.trim().to_string()),
            Value::Number(number) => Some(number.to_string()),
            _ => {
                self.fail(field, MSG_NOT_STRING);
                None
            }
        }
    }

    fn check_len(&mut self, field: &str, value: String, max_len: usize) -> Option<String> {
        if value.chars().count() > max_len {
            self.fail(
                field,
                format!("Ensure this field has no more than {} characters.", max_len),
            );
            return None;
        }
        Some(value)
    }

    fn required_text(&mut self, field: &str) -> Option<String> {
        let fields = self.fields;
        let value = match fields.get(field) {
            None => {
                self.fail(field, MSG_REQUIRED);
                return None;
            }
            Some(Value::Null) => {
                self.fail(field, MSG_NULL);
                return None;
            }
            Some(value) => value,
        };
        let text = self.text(field, value)?;
        if text.is_empty() {
            self.fail(field, MSG_BLANK);
            return None;
        }
        Some(text)
    }

    fn required_string(&mut self, field: &str, max_len: usize) -> Option<String> {
        let text = self.required_text(field)?;
        self.check_len(field, text, max_len)
    }

    /// Outer `None` means the field is invalid; inner `None` means absent.
    fn optional_string(&mut self, field: &str, max_len: usize) -> Option<Option<String>> {
        let fields = self.fields;
        let value = match fields.get(field) {
            None | Some(Value::Null) => return Some(None),
            Some(value) => value,
        };
        let text = self.text(field, value)?;
        if text.is_empty() {
            return Some(None);
        }
        self.check_len(field, text, max_len).map(Some)
    }

    fn trans_id(&mut self) -> Option<Uuid> {
        let raw = self.required_text("trans_id")?;
        match parse_identifier(&raw) {
            Ok(id) => Some(id),
            Err(_) => {
                self.fail("trans_id", MSG_INVALID_UUID);
                None
            }
        }
    }

    fn trans_tms(&mut self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        let fields = self.fields;
        match fields.get("trans_tms") {
            None => Some(Utc::now().fixed_offset()),
            Some(Value::Null) => {
                self.fail("trans_tms", MSG_NULL);
                None
            }
            Some(Value::String(raw)) => match parse_event_timestamp(raw, offset) {
                Ok(ts) => Some(ts),
                Err(_) => {
                    self.fail("trans_tms", MSG_INVALID_DATETIME);
                    None
                }
            },
            Some(_) => {
                self.fail("trans_tms", MSG_INVALID_DATETIME);
                None
            }
        }
    }

    fn event_cnt(&mut self) -> Option<i32> {
        let fields = self.fields;
        let value = match fields.get("event_cnt") {
            None => return Some(DEFAULT_EVENT_CNT),
            Some(Value::Null) => {
                self.fail("event_cnt", MSG_NULL);
                return None;
            }
            Some(value) => value,
        };
        let parsed = match value {
            Value::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
                    .map(|f| f as i64)
            }),
            Value::String(raw) => raw.trim().parse::<i64>().ok(),
            _ => None,
        };
        let Some(count) = parsed else {
            self.fail("event_cnt", MSG_INVALID_INTEGER);
            return None;
        };
        if count < 1 {
            self.fail("event_cnt", "Ensure this value is greater than or equal to 1.");
            return None;
        }
        match i32::try_from(count) {
            Ok(count) => Some(count),
            Err(_) => {
                self.fail(
                    "event_cnt",
                    format!("Ensure this value is less than or equal to {}.", i32::MAX),
                );
                None
            }
        }
    }

    fn location_cd(&mut self) -> Option<LocationCode> {
        let raw = self.required_text("location_cd")?;
        match raw.parse::<LocationCode>() {
            Ok(code) => Some(code),
            Err(value) => {
                self.fail("location_cd", format!("\"{}\" is not a valid choice.", value));
                None
            }
        }
    }
}
