//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeptiqError {
    #[error(
        "CONFIG/NOT_FOUND: scoring config version '{requested}' not found; registered versions: {}",
        .available.join(", ")
    )]
    ConfigNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("CONFIG/DUPLICATE: scoring config version '{0}' is already published")]
    DuplicateVersion(String),

    #[error("CONFIG/INVALID: scoring config '{version}': {reason}")]
    InvalidConfig { version: String, reason: String },

    #[error("CONFIG/NO_DEFAULT: default version '{0}' is not registered")]
    NoDefaultVersion(String),

    #[error("CONFIG/PARSE: {0}")]
    ConfigParse(String),

    #[error("AUDIT/{0}")]
    Audit(String),
}

impl PeptiqError {
    /// True for errors caused by asking for a version nobody published.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PeptiqError::ConfigNotFound { .. })
    }
}
