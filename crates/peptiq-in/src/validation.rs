//! Validation failures
//!
//! Each failure records which field broke which rule and the offending
//! value. Text is produced only by `Display`, at the boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rule a field violated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Field absent or null
    Missing,
    /// Expected a string
    NotAString,
    /// String blank after trimming
    Empty,
    /// String is not a recognizable date
    InvalidDate,
    /// Value does not coerce to a finite number
    NotANumber,
    /// Number outside an inclusive range
    OutOfRange { min: f64, max: f64 },
    /// Number below zero
    Negative,
    /// Number is not an integer >= 1
    NotPositiveInteger,
}

/// One violated rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Input key that failed
    pub field: String,

    /// Rule that failed
    #[serde(flatten)]
    pub kind: ValidationErrorKind,

    /// Offending value, when one was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ValidationErrorKind, value: Option<&Value>) -> Self {
        Self {
            field: field.into(),
            kind,
            value: value.filter(|v| !v.is_null()).cloned(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let field = &self.field;
        let message = match &self.kind {
            ValidationErrorKind::Missing => format!("{} is required", field),
            ValidationErrorKind::NotAString => format!("{} must be a string", field),
            ValidationErrorKind::Empty => format!("{} must not be empty", field),
            ValidationErrorKind::InvalidDate => format!("{} must be a valid date", field),
            ValidationErrorKind::NotANumber => format!("{} must be a number", field),
            ValidationErrorKind::OutOfRange { min, max } => {
                format!("{} must be between {} and {}", field, min, max)
            }
            ValidationErrorKind::Negative => format!("{} must be greater than or equal to 0", field),
            ValidationErrorKind::NotPositiveInteger => format!("{} must be a positive integer", field),
        };

        match &self.value {
            Some(value) => write!(f, "{} (got {})", message, value),
            None => f.write_str(&message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Render a list of failures as plain messages, in order
pub fn messages(errors: &[ValidationError]) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}
