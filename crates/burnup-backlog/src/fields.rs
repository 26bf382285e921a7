//! Field transforms for raw export cells.
//!
//! Each transform fails independently; the caller decides how to default.

use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp layout used by the Jira CSV export, e.g. `05/Mar/24 3:04 PM`.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%d/%b/%y %I:%M %p";
/// Same layout on a 24-hour clock; the trailing AM/PM marker is stripped first.
const EXPORT_TIMESTAMP_FORMAT_24H: &str = "%d/%b/%y %H:%M";
/// ISO 8601 date used in every report.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A cell that could not be converted to its typed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse {raw:?} as {expected}")]
pub struct FieldError {
    pub raw: String,
    pub expected: &'static str,
}

impl FieldError {
    fn new(raw: &str, expected: &'static str) -> Self {
        Self {
            raw: raw.to_string(),
            expected,
        }
    }
}

/// Parse a story-point estimate. Empty cells mean zero.
pub fn parse_points(raw: &str) -> Result<f64, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(points) if points.is_finite() => Ok(points),
        _ => Err(FieldError::new(raw, "a decimal number")),
    }
}

/// Parse an export timestamp. Empty cells mean absent.
pub fn parse_timestamp(raw: &str) -> Result<Option<NaiveDateTime>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, EXPORT_TIMESTAMP_FORMAT) {
        return Ok(Some(ts));
    }

    // Exports occasionally pair a 24-hour clock with a redundant marker.
    let without_marker = trimmed
        .strip_suffix("AM")
        .or_else(|| trimmed.strip_suffix("PM"))
        .or_else(|| trimmed.strip_suffix("am"))
        .or_else(|| trimmed.strip_suffix("pm"))
        .map(str::trim_end);
    without_marker
        .and_then(|s| NaiveDateTime::parse_from_str(s, EXPORT_TIMESTAMP_FORMAT_24H).ok())
        .map(Some)
        .ok_or_else(|| FieldError::new(raw, "a DD/Mon/YY HH:MM AM|PM timestamp"))
}

/// Render a calendar day the way every report expects it.
pub fn format_iso_date(day: NaiveDate) -> String {
    day.format(ISO_DATE_FORMAT).to_string()
}
