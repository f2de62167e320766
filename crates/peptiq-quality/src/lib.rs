//! PeptIQ Quality: deterministic lab report scoring
//!
//! This crate turns a validated [`LabReport`] into a bounded 0-100 score
//! with a confidence annotation, risk flags and a per-component breakdown.
//! Scoring is closed-form arithmetic over the parameters of one published
//! config version, so identical inputs always produce identical results.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use peptiq_core::LabReport;
//! use peptiq_quality::ScoringEngine;
//! use peptiq_registry::ConfigRegistry;
//!
//! let registry = ConfigRegistry::standard();
//! let engine = ScoringEngine::new(&registry);
//! let now = Utc::now();
//!
//! let report = LabReport {
//!     id: "rpt_example".to_string(),
//!     batch_id: "B-1".to_string(),
//!     supplier_id: "acme".to_string(),
//!     lab_id: "lab-7".to_string(),
//!     test_date: now - Duration::days(10),
//!     purity_percent: 99.0,
//!     endotoxin_level: 1.0,
//!     heavy_metals_ppm: 2.0,
//!     sample_size: 5,
//!     raw_payload: "{}".to_string(),
//! };
//!
//! let result = engine.score_at(&report, 0.0, None, now).unwrap();
//! assert_eq!(result.score, 59.4);
//! assert_eq!(result.confidence, 1.0);
//! assert!(result.risk_flags.is_empty());
//! ```

pub mod components;
pub mod engine;
pub mod flags;
pub mod suppliers;
pub mod trends;

pub use engine::{score_with_config, ScoringEngine};
pub use flags::evaluate_flags;
pub use suppliers::{summarize_suppliers, SupplierSummary};
pub use trends::{
    batch_variance, batch_variances, DecliningSupplier, SafetyConcern, Severity, TrendDetector,
    TrendSummary, VarianceIssue,
};

pub use peptiq_core::{LabReport, RiskFlag, ScoreBreakdown, ScoreResult};

use peptiq_core::PeptiqError;
use peptiq_registry::ConfigRegistry;

/// Quick scoring function
pub fn score(
    registry: &ConfigRegistry,
    report: &LabReport,
    batch_variance: f64,
    version: Option<&str>,
) -> Result<ScoreResult, PeptiqError> {
    ScoringEngine::new(registry).score(report, batch_variance, version)
}
