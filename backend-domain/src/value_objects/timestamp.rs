// Transaction timestamp value object
//
// Upstream systems send `YYYYMMDDHHMMSSmmm` followed by the literal zone tag
// `EDT`. The wall-clock digits are relabelled under the configured target
// offset; they are NOT converted from Eastern time.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, TimeZone};

use crate::errors::FormatError;

pub const SOURCE_ZONE_TAG: &str = "EDT";
/// Asia/Kolkata has not observed DST since 1945, so a fixed offset is exact.
pub const DEFAULT_TARGET_OFFSET: &str = "+05:30";

const DIGIT_COUNT: usize = 17;
const RAW_LEN: usize = DIGIT_COUNT + SOURCE_ZONE_TAG.len();

pub fn parse_offset(value: &str) -> Option<FixedOffset> {
    value.trim().parse::<FixedOffset>().ok()
}

/// Parses the proprietary `...EDT` grammar into a zoned timestamp.
pub fn parse_source_timestamp(
    raw: &str,
    target: FixedOffset,
) -> Result<DateTime<FixedOffset>, FormatError> {
    let invalid = || FormatError::Timestamp(raw.to_string());
    let bytes = raw.as_bytes();
    if bytes.len() != RAW_LEN || &bytes[DIGIT_COUNT..] != SOURCE_ZONE_TAG.as_bytes() {
        return Err(invalid());
    }
    if !bytes[..DIGIT_COUNT].iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    // All 17 leading bytes are ASCII digits, so byte slicing is char-aligned.
    let field = |start: usize, end: usize| raw[start..end].parse::<u32>().map_err(|_| invalid());

    let year = raw[0..4].parse::<i32>().map_err(|_| invalid())?;
    if year < 1 {
        return Err(invalid());
    }
    let naive = NaiveDate::from_ymd_opt(year, field(4, 6)?, field(6, 8)?)
        .and_then(|date| {
            date.and_hms_milli_opt(
                field(8, 10).ok()?,
                field(10, 12).ok()?,
                field(12, 14).ok()?,
                field(14, 17).ok()?,
            )
        })
        .ok_or_else(invalid)?;

    target
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(invalid)
}

/// Converts the proprietary grammar into an RFC 3339 string with millisecond
/// precision and an explicit offset.
pub fn normalize_timestamp(raw: &str, target: FixedOffset) -> Result<String, FormatError> {
    parse_source_timestamp(raw, target).map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, false))
}

/// Accepts either the proprietary grammar or an RFC 3339 timestamp, the form
/// stored events are returned in.
pub fn parse_event_timestamp(
    raw: &str,
    target: FixedOffset,
) -> Result<DateTime<FixedOffset>, FormatError> {
    if raw.ends_with(SOURCE_ZONE_TAG) {
        return parse_source_timestamp(raw, target);
    }
    DateTime::parse_from_rfc3339(raw.trim()).map_err(|_| FormatError::Timestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kolkata() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("offset")
    }

    #[test]
    fn normalizes_source_grammar() {
        let iso = normalize_timestamp("20240914102030123EDT", kolkata()).expect("normalize");
        assert_eq!(iso, "2024-09-14T10:20:30.123+05:30");
    }

    #[test]
    fn relabels_wall_clock_instead_of_converting() {
        // Observed upstream behavior: the EDT digits keep their wall-clock
        // value and only the offset changes. Revisit if the zone handling is
        // ever clarified as a true conversion.
        let ts = parse_source_timestamp("20240914000000000EDT", kolkata()).expect("parse");
        assert_eq!(ts.to_rfc3339(), "2024-09-14T00:00:00+05:30");
        let eastern = FixedOffset::west_opt(4 * 3600).expect("offset");
        assert_ne!(ts, eastern.with_ymd_and_hms(2024, 9, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn honours_configured_offset() {
        let utc = FixedOffset::east_opt(0).expect("offset");
        let iso = normalize_timestamp("20240101235959999EDT", utc).expect("normalize");
        assert_eq!(iso, "2024-01-01T23:59:59.999+00:00");
    }

    #[test]
    fn rejects_everything_else() {
        for raw in [
            "2024-09-14T10:20:30Z",
            "20240914102030123",
            "20240914102030123EST",
            "20240914102030123EDTX",
            "2024091410203012EDT",
            "2024091410203O123EDT",
            "20241314102030123EDT",
            "20240230102030123EDT",
            "20240914242030123EDT",
            "20240914106030123EDT",
            "00000914102030123EDT",
            "２0240914102030123EDT",
            "",
        ] {
            let err = normalize_timestamp(raw, kolkata()).expect_err(raw);
            assert_eq!(err, FormatError::Timestamp(raw.to_string()));
        }
    }

    #[test]
    fn output_always_carries_explicit_offset() {
        for raw in ["20000229000000000EDT", "19991231235959999EDT", "20240914102030001EDT"] {
            let iso = normalize_timestamp(raw, kolkata()).expect(raw);
            let reparsed = DateTime::parse_from_rfc3339(&iso).expect("rfc3339");
            assert_eq!(reparsed.offset(), &kolkata());
            assert!(iso.ends_with("+05:30"));
        }
    }

    #[test]
    fn event_timestamp_accepts_rfc3339() {
        let ts = parse_event_timestamp("2024-09-14T10:20:30Z", kolkata()).expect("rfc3339");
        assert_eq!(ts.offset().local_minus_utc(), 0);
        let source = parse_event_timestamp("20240914102030123EDT", kolkata()).expect("source");
        assert_eq!(source.offset(), &kolkata());
        assert!(parse_event_timestamp("14/09/2024", kolkata()).is_err());
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_offset(DEFAULT_TARGET_OFFSET), Some(kolkata()));
        assert_eq!(parse_offset("-04:00"), FixedOffset::west_opt(4 * 3600));
        assert_eq!(parse_offset("Asia/Kolkata"), None);
    }
}
