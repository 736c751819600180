//! Record timestamp parsing.
//!
//! The record store keys observations by `YYYYMMDD-HHMMSS`, with a `_NN`
//! suffix when one capture produced several frame results. This is the only
//! place those strings are taken apart; everything downstream works on
//! [`NaiveDateTime`] truncated to the minute.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ValidationError;

/// Parse a record timestamp to minute resolution.
///
/// Accepts `YYYYMMDD-HHMM`, `YYYYMMDD-HHMMSS` and `YYYYMMDD-HHMMSS_NN`.
/// Seconds are validated, then dropped. Returns `None` for anything else.
pub fn parse_record_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let head = raw.get(..13)?;
    let minute = NaiveDateTime::parse_from_str(head, "%Y%m%d-%H%M").ok()?;

    let rest = &raw[13..];
    if rest.is_empty() {
        return Some(minute);
    }

    let seconds = rest.get(..2)?;
    match seconds.parse::<u32>() {
        Ok(s) if s < 60 && seconds.bytes().all(|b| b.is_ascii_digit()) => {}
        _ => return None,
    }

    let suffix = &rest[2..];
    if suffix.is_empty() {
        return Some(minute);
    }
    let index = suffix.strip_prefix('_')?;
    if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
        Some(minute)
    } else {
        None
    }
}

/// Format a day the way record timestamps begin (`YYYYMMDD`).
pub fn record_day_prefix(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}

/// Format a moment as a record timestamp (`YYYYMMDD-HHMMSS`).
pub fn format_record_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%d-%H%M%S").to_string()
}

/// Parse a caller-supplied day, `YYYY-MM-DD` or `YYYYMMDD`.
pub fn parse_day(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(day);
    }
    if input.len() == 8 && input.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(day) = NaiveDate::parse_from_str(input, "%Y%m%d") {
            return Ok(day);
        }
    }
    Err(ValidationError::InvalidDate(input.to_string()))
}
