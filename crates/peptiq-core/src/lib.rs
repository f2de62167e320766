//! PeptIQ Core: data model, unified errors and numeric rules
//!
//! Shared by every PeptIQ crate. Nothing here performs I/O or holds state;
//! the types describe validated lab reports, score results and the errors
//! the registry, scoring engine and audit trail can raise.

pub mod data_model;
pub mod error;
pub mod ids;
pub mod rounding;

pub use data_model::{LabReport, RawInput, RiskFlag, ScoreBreakdown, ScoreResult};
pub use error::PeptiqError;
pub use rounding::{round1, round2, round_half_up};

/// PeptIQ engine version
pub const PEPTIQ_VERSION: &str = "0.1.0";
