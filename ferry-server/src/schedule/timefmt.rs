//! Display-time normalization for upstream timestamps.
//!
//! The praamid.ee API is inconsistent about timestamp formats: the same
//! field may arrive with a `Z` suffix, a `+HH:MM` or `+HHMM` offset,
//! fractional seconds, or no offset at all. This module collapses all of
//! them into a single "HH:MM" UTC display string and never fails: a value
//! we cannot parse is degraded to a best-effort slice rather than an error.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Formats accepted for offset-bearing timestamps that are not valid
/// RFC 3339 (`+0300` style offsets appear upstream).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Formats accepted for timestamps with no offset. These are treated as
/// already being UTC; the upstream never sends local wall-clock times.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Convert an upstream ISO-8601 timestamp to a zero-padded 24-hour
/// "HH:MM" string in UTC.
///
/// Unparseable input falls back to the five characters after the `T`
/// separator, and failing even that, the input is returned unchanged.
/// An empty string becomes `"N/A"`.
///
/// # Examples
///
/// ```
/// use ferry_server::schedule::normalize_display_time;
///
/// assert_eq!(normalize_display_time("2025-07-01T05:30:00Z"), "05:30");
/// assert_eq!(normalize_display_time("2025-07-01T08:30:00+03:00"), "05:30");
/// assert_eq!(normalize_display_time("2025-07-01T05:30:00"), "05:30");
/// assert_eq!(normalize_display_time("not a timestamp"), "not a timestamp");
/// ```
pub fn normalize_display_time(raw: &str) -> String {
    if raw.is_empty() {
        return "N/A".to_string();
    }

    match parse_instant(raw) {
        Some(utc) => utc.format("%H:%M").to_string(),
        None => fallback_hhmm(raw),
    }
}

/// Parse any of the upstream timestamp variants to a UTC instant.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    // Covers `Z`, `+HH:MM`/`-HH:MM`, and fractional seconds.
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Best-effort extraction of "HH:MM" from an unparseable timestamp.
fn fallback_hhmm(raw: &str) -> String {
    raw.split_once('T')
        .and_then(|(_, time)| time.get(..5))
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}
