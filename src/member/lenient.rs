//! Tolerant field deserialisers for loosely-shaped member records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// String or number; anything else becomes the empty string.
pub(super) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// String or number; null, blank and anything else become `None`.
pub(super) fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// RFC 3339 string, bare `YYYY-MM-DD` date, or epoch milliseconds.
pub(super) fn optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::String(s) => parse_timestamp(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    Ok(parsed)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(Value::from(" x ")), Some("x".to_string()));
        assert_eq!(scalar_text(Value::from(42)), Some("42".to_string()));
        assert_eq!(scalar_text(Value::from("  ")), None);
        assert_eq!(scalar_text(Value::Null), None);
        assert_eq!(scalar_text(Value::Bool(true)), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-02T03:04:05+02:00").is_some());
        assert_eq!(
            parse_timestamp("2024-01-02").map(|ts| ts.to_rfc3339()),
            Some("2024-01-02T00:00:00+00:00".to_string())
        );
        assert!(parse_timestamp("yesterday").is_none());
    }
}
