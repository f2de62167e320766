//! Value normalization for PeptIQ-IN.
//!
//! Converts loosely typed JSON values into the shapes a report needs:
//! - Strings are trimmed and must be non-empty
//! - Numbers may arrive as JSON numbers or numeric strings
//! - Dates accept RFC 3339, naive date-times (UTC) and plain dates

use crate::validation::ValidationErrorKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Naive date-time layouts, interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Trim a string value, rejecting missing, non-string and blank values
pub fn normalize_string(value: Option<&Value>) -> Result<String, ValidationErrorKind> {
    match value {
        None | Some(Value::Null) => Err(ValidationErrorKind::Missing),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(ValidationErrorKind::Empty)
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(_) => Err(ValidationErrorKind::NotAString),
    }
}

/// Coerce a JSON number or numeric string to a finite `f64`
pub fn coerce_number(value: Option<&Value>) -> Result<f64, ValidationErrorKind> {
    let number = match value {
        None | Some(Value::Null) => return Err(ValidationErrorKind::Missing),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Some(_) => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ValidationErrorKind::NotANumber),
    }
}

/// Parse a calendar date or date-time
pub fn parse_test_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
