// Line flattener
// Expands `{"records": [{envelope..., "event": [line, ...]}]}` into one flat
// object per (envelope, line) pair.

use serde_json::{Map, Value};

use crate::errors::{DomainError, StructuralError, ValidationError};

pub const RECORDS_KEY: &str = "records";
pub const EVENT_KEY: &str = "event";

pub const NO_DATA_FOUND: &str = "No data found";
pub const NO_RECORDS_FOUND: &str = "No records found";

/// One envelope merged with one of its event lines.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatLine {
    /// Position of the envelope in `records`.
    pub record: usize,
    /// Position of the line in the envelope's `event` list.
    pub line: usize,
    pub fields: Map<String, Value>,
}

impl FlatLine {
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

pub fn flatten_batch(payload: &Value) -> Result<Vec<FlatLine>, DomainError> {
    let body = match payload {
        Value::Null => return Err(no_data()),
        Value::Object(body) if body.is_empty() => return Err(no_data()),
        Value::Object(body) => body,
        _ => return Err(StructuralError::PayloadNotObject.into()),
    };

    let records = match body.get(RECORDS_KEY) {
        None | Some(Value::Null) => return Err(no_records()),
        Some(Value::Array(records)) if records.is_empty() => return Err(no_records()),
        Some(Value::Array(records)) => records,
        Some(_) => return Err(StructuralError::RecordsNotList.into()),
    };

    let mut lines = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let envelope = record
            .as_object()
            .ok_or(StructuralError::RecordNotObject { index })?;
        let events = envelope
            .get(EVENT_KEY)
            .and_then(Value::as_array)
            .ok_or(StructuralError::MissingEventList { index })?;

        for (line, event) in events.iter().enumerate() {
            let event = event
                .as_object()
                .ok_or(StructuralError::EventLineNotObject { index, line })?;
            let mut fields = envelope.clone();
            for (key, value) in event {
                fields.insert(key.clone(), value.clone());
            }
            fields.remove(EVENT_KEY);
            lines.push(FlatLine {
                record: index,
                line,
                fields,
            });
        }
    }
    Ok(lines)
}

fn no_data() -> DomainError {
    ValidationError::Message(NO_DATA_FOUND.to_string()).into()
}

fn no_records() -> DomainError {
    ValidationError::Message(NO_RECORDS_FOUND.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(trans_id: &str, lines: Value) -> Value {
        json!({
            "trans_id": trans_id,
            "trans_tms": "20240914102030123EDT",
            "rc_num": "10002",
            "client_id": "RPS-00001",
            "event": lines,
        })
    }

    #[test]
    fn produces_one_line_per_event() {
        let payload = json!({
            "records": [
                envelope("a", json!([{"event_cnt": 1, "location_cd": "DESTINATION"}])),
                envelope("b", json!([
                    {"event_cnt": 2, "location_cd": "OUTLET ID"},
                    {"event_cnt": 3, "location_cd": "CUSTOMER NUMBER"},
                    {"event_cnt": 4, "location_cd": "DESTINATION"},
                ])),
            ]
        });
        let lines = flatten_batch(&payload).expect("flatten");
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines.iter().map(|l| (l.record, l.line)).collect::<Vec<_>>(),
            vec![(0, 0), (1, 0), (1, 1), (1, 2)]
        );
        for line in &lines[1..] {
            assert_eq!(line.str_field("trans_id"), Some("b"));
            assert_eq!(line.str_field("client_id"), Some("RPS-00001"));
            assert!(!line.fields.contains_key(EVENT_KEY));
        }
        assert_eq!(lines[3].fields["event_cnt"], json!(4));
    }

    #[test]
    fn event_line_wins_on_key_collision() {
        let payload = json!({
            "records": [envelope("a", json!([{"rc_num": "override", "event": "nested"}]))]
        });
        let lines = flatten_batch(&payload).expect("flatten");
        assert_eq!(lines[0].str_field("rc_num"), Some("override"));
        assert!(!lines[0].fields.contains_key(EVENT_KEY));
    }

    #[test]
    fn empty_event_list_contributes_nothing() {
        let payload = json!({
            "records": [envelope("a", json!([])), envelope("b", json!([{"location_cd": "DESTINATION"}]))]
        });
        let lines = flatten_batch(&payload).expect("flatten");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].record, 1);
    }

    #[test]
    fn rejects_missing_or_empty_records() {
        for payload in [json!({"records": []}), json!({"other": 1}), json!({"records": null})] {
            let err = flatten_batch(&payload).expect_err("no records");
            assert_eq!(
                err,
                DomainError::Validation(ValidationError::Message(NO_RECORDS_FOUND.to_string()))
            );
        }
        for payload in [json!({}), Value::Null] {
            let err = flatten_batch(&payload).expect_err("no data");
            assert_eq!(
                err,
                DomainError::Validation(ValidationError::Message(NO_DATA_FOUND.to_string()))
            );
        }
    }

    #[test]
    fn rejects_malformed_shapes() {
        let cases = [
            (json!([1, 2]), StructuralError::PayloadNotObject),
            (json!({"records": {"a": 1}}), StructuralError::RecordsNotList),
            (json!({"records": ["x"]}), StructuralError::RecordNotObject { index: 0 }),
            (
                json!({"records": [envelope("a", json!([])), {"trans_id": "b"}]}),
                StructuralError::MissingEventList { index: 1 },
            ),
            (
                json!({"records": [envelope("a", json!("not a list"))]}),
                StructuralError::MissingEventList { index: 0 },
            ),
            (
                json!({"records": [envelope("a", json!([{"location_cd": "DESTINATION"}, 7]))]}),
                StructuralError::EventLineNotObject { index: 0, line: 1 },
            ),
        ];
        for (payload, expected) in cases {
            assert_eq!(flatten_batch(&payload), Err(DomainError::Structural(expected)));
        }
    }
}
