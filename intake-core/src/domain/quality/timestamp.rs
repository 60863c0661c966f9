// intake-core/src/domain/quality/timestamp.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::dataset::Value;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Lenient timestamp parse. Anything unparsable (including non-text cells)
/// becomes `None`, which the temporal scan treats like a null.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.naive_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
