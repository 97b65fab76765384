//! Nightscout `entries.json` feed: parsing, HTTP client and the source seam
//! used by the request pipeline.

use chrono::{DateTime, Utc};
use nightscout_core::{DirectionHint, Measurement};
use serde_json::Value;

mod client;
mod error;
mod source;

pub use client::{hashed_secret, NightscoutClient, NightscoutClientBuilder, DEFAULT_TIMEOUT};
pub use error::FeedError;
pub use source::{EntrySource, StaticEntries};

/// Parse a feed body from a JSON string. Entries keep feed order (newest first).
pub fn parse_entries_str(entries_json: &str) -> Result<Vec<Measurement>, FeedError> {
    let value: Value =
        serde_json::from_str(entries_json).map_err(|err| FeedError::Parse(err.to_string()))?;
    parse_entries_value(&value)
}

/// Parse a feed body from a `serde_json::Value`.
pub fn parse_entries_value(entries: &Value) -> Result<Vec<Measurement>, FeedError> {
    let entries = entries
        .as_array()
        .ok_or_else(|| FeedError::Parse("Expected a JSON array of entries".to_string()))?;

    Ok(entries.iter().filter_map(parse_entry).collect())
}

fn parse_entry(entry: &Value) -> Option<Measurement> {
    // Meter readings and calibrations share the endpoint but carry no sgv.
    if let Some(kind) = entry.get("type").and_then(Value::as_str) {
        if kind != "sgv" {
            return None;
        }
    }

    let sgv = entry.get("sgv")?;
    let value = sgv
        .as_i64()
        .or_else(|| sgv.as_f64().map(|v| v.round() as i64))
        .or_else(|| sgv.as_str().and_then(|s| s.trim().parse().ok()))?;
    let value = i32::try_from(value).ok()?;

    let direction = entry
        .get("direction")
        .and_then(Value::as_str)
        .and_then(DirectionHint::from_nightscout);

    Some(Measurement::new(value, extract_recorded_at(entry)).with_direction(direction))
}

fn extract_recorded_at(entry: &Value) -> Option<DateTime<Utc>> {
    if let Some(date) = entry.get("date") {
        let millis = date.as_i64().or_else(|| date.as_f64().map(|v| v as i64));
        if let Some(dt) = millis.and_then(DateTime::from_timestamp_millis) {
            return Some(dt);
        }
    }

    entry
        .get("dateString")
        .and_then(Value::as_str)
        .and_then(parse_datetime)
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn keeps_feed_order_and_reads_fields() {
        let body = json!([
            {"sgv": 132, "date": 1714566900000i64, "direction": "FortyFiveDown", "type": "sgv"},
            {"sgv": 150, "date": 1714566600000i64, "direction": "NOT COMPUTABLE", "type": "sgv"}
        ]);

        let entries = parse_entries_value(&body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, 132);
        assert_eq!(
            entries[0].recorded_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 35, 0).single()
        );
        assert_eq!(entries[0].direction, Some(DirectionHint::FortyFiveDown));
        assert_eq!(entries[1].direction, None);
    }

    #[test]
    fn skips_entries_without_sensor_value() {
        let body = json!([
            {"type": "mbg", "mbg": 110, "date": 1714566900000i64},
            {"type": "cal", "slope": 900, "date": 1714566900000i64},
            {"date": 1714566900000i64},
            {"sgv": 99, "date": 1714566600000i64}
        ]);

        let entries = parse_entries_value(&body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, 99);
    }

    #[test]
    fn falls_back_to_date_string() {
        let body = json!([
            {"sgv": 101, "dateString": "2024-05-01T08:35:00.000-04:00"},
            {"sgv": 102, "date": "yesterday"}
        ]);

        let entries = parse_entries_value(&body).unwrap();
        assert_eq!(
            entries[0].recorded_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 35, 0).single()
        );
        assert_eq!(entries[1].recorded_at, None);
    }

    #[test]
    fn rejects_non_array_body() {
        let err = parse_entries_str(r#"{"status": 401}"#).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
        assert!(matches!(
            parse_entries_str("not json").unwrap_err(),
            FeedError::Parse(_)
        ));
    }

    #[test]
    fn empty_array_is_not_an_error() {
        assert!(parse_entries_str("[]").unwrap().is_empty());
    }
}
