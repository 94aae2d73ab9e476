//! Strict parsing of GitHub timestamps

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{Error, Result};

/// The only timestamp shape accepted from the API
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a `YYYY-MM-DDTHH:MM:SSZ` UTC timestamp.
///
/// Offsets, fractional seconds and date-only values are rejected. `field` is
/// only used to label the error.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Parse an optional timestamp, passing `None` through
pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(field, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_valid_timestamp() {
        let parsed = parse_timestamp("created_at", "2024-03-05T14:07:09Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap());
    }

    #[test]
    fn test_parse_rejects_offset() {
        let err = parse_timestamp("created_at", "2024-03-05T14:07:09+02:00").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTimestamp {
                field: "created_at",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_fractional_seconds() {
        assert!(parse_timestamp("created_at", "2024-03-05T14:07:09.123Z").is_err());
    }

    #[test]
    fn test_parse_rejects_date_only() {
        assert!(parse_timestamp("closed_at", "2024-03-05").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("date", "not a date").is_err());
        assert!(parse_timestamp("date", "").is_err());
    }

    #[test]
    fn test_parse_optional_none() {
        assert_eq!(parse_optional_timestamp("closed_at", None).unwrap(), None);
    }

    #[test]
    fn test_parse_optional_propagates_error() {
        assert!(parse_optional_timestamp("closed_at", Some("bad")).is_err());
    }
}
