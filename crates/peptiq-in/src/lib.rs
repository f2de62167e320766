//! PeptIQ-IN: Lab report ingestion
//!
//! This crate is the boundary between untrusted submissions and the rest of
//! PeptIQ. [`ingest`] checks every rule on a raw key/value map and either
//! returns a normalized [`LabReport`] or the complete list of failures.
//!
//! # Example
//!
//! ```
//! use peptiq_in::ingest;
//! use serde_json::json;
//!
//! let raw = json!({
//!     "batch_id": "B-1001",
//!     "supplier_id": "acme",
//!     "lab_id": "lab-7",
//!     "test_date": "2026-01-15",
//!     "purity_percent": 98.7,
//!     "endotoxin_level": "0.4",
//!     "heavy_metals_ppm": 1.2,
//!     "sample_size": 3
//! });
//!
//! let report = ingest(raw.as_object().unwrap()).unwrap();
//! assert_eq!(report.endotoxin_level, 0.4);
//!
//! let errors = ingest(json!({ "purity_percent": 140 }).as_object().unwrap()).unwrap_err();
//! assert_eq!(errors.len(), 8);
//! ```

pub mod normalizer;
pub mod validation;

pub use peptiq_core::{LabReport, RawInput};
pub use validation::{messages, ValidationError, ValidationErrorKind};

use peptiq_core::ids;
use serde_json::Value;

/// Input keys the validator reads; any other key is kept only in the raw payload
pub const REQUIRED_FIELDS: [&str; 8] = [
    "batch_id",
    "supplier_id",
    "lab_id",
    "test_date",
    "purity_percent",
    "endotoxin_level",
    "heavy_metals_ppm",
    "sample_size",
];

/// Validate a raw submission and build a report
///
/// Every rule is evaluated; on failure all violations are returned in field
/// order and no report id is allocated.
pub fn ingest(raw: &RawInput) -> Result<LabReport, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let batch_id = string_field(raw, "batch_id", &mut errors);
    let supplier_id = string_field(raw, "supplier_id", &mut errors);
    let lab_id = string_field(raw, "lab_id", &mut errors);
    let test_date = date_field(raw, "test_date", &mut errors);

    let purity_percent = number_field(raw, "purity_percent", &mut errors).filter(|&v| {
        let range = ValidationErrorKind::OutOfRange { min: 0.0, max: 100.0 };
        check(raw, "purity_percent", (0.0..=100.0).contains(&v), &mut errors, range)
    });
    let endotoxin_level = non_negative_field(raw, "endotoxin_level", &mut errors);
    let heavy_metals_ppm = non_negative_field(raw, "heavy_metals_ppm", &mut errors);
    let sample_size = number_field(raw, "sample_size", &mut errors).and_then(|v| {
        let whole = v.fract() == 0.0 && v >= 1.0 && v <= f64::from(u32::MAX);
        check(raw, "sample_size", whole, &mut errors, ValidationErrorKind::NotPositiveInteger)
            .then_some(v as u32)
    });

    let (
        Some(batch_id),
        Some(supplier_id),
        Some(lab_id),
        Some(test_date),
        Some(purity_percent),
        Some(endotoxin_level),
        Some(heavy_metals_ppm),
        Some(sample_size),
    ) = (
        batch_id,
        supplier_id,
        lab_id,
        test_date,
        purity_percent,
        endotoxin_level,
        heavy_metals_ppm,
        sample_size,
    )
    else {
        tracing::warn!(failures = errors.len(), "lab report rejected");
        return Err(errors);
    };

    let report = LabReport {
        id: ids::new_report_id(),
        batch_id,
        supplier_id,
        lab_id,
        test_date,
        purity_percent,
        endotoxin_level,
        heavy_metals_ppm,
        sample_size,
        raw_payload: canonical_payload(raw),
    };

    tracing::info!(report_id = %report.id, batch_id = %report.batch_id, "lab report ingested");
    Ok(report)
}

/// Serialized form of a submission as stored in the raw payload
///
/// Keys are emitted in a stable order, so the same submission always yields
/// the same bytes.
pub fn canonical_payload(raw: &RawInput) -> String {
    Value::Object(raw.clone()).to_string()
}

fn string_field(raw: &RawInput, field: &str, errors: &mut Vec<ValidationError>) -> Option<String> {
    let value = raw.get(field);
    normalizer::normalize_string(value)
        .map_err(|kind| errors.push(ValidationError::new(field, kind, value)))
        .ok()
}

fn date_field(
    raw: &RawInput,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    let text = string_field(raw, field, errors)?;
    let parsed = normalizer::parse_test_date(&text);
    if parsed.is_none() {
        errors.push(ValidationError::new(field, ValidationErrorKind::InvalidDate, raw.get(field)));
    }
    parsed
}

fn number_field(raw: &RawInput, field: &str, errors: &mut Vec<ValidationError>) -> Option<f64> {
    let value = raw.get(field);
    normalizer::coerce_number(value)
        .map_err(|kind| errors.push(ValidationError::new(field, kind, value)))
        .ok()
}

fn non_negative_field(raw: &RawInput, field: &str, errors: &mut Vec<ValidationError>) -> Option<f64> {
    number_field(raw, field, errors)
        .filter(|&v| check(raw, field, v >= 0.0, errors, ValidationErrorKind::Negative))
}

/// Record `kind` against `field` unless `ok` holds
fn check(
    raw: &RawInput,
    field: &str,
    ok: bool,
    errors: &mut Vec<ValidationError>,
    kind: ValidationErrorKind,
) -> bool {
    if !ok {
        errors.push(ValidationError::new(field, kind, raw.get(field)));
    }
    ok
}
