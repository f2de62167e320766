//! PeptIQ Audit: append-only report history
//!
//! Every action taken on a lab report is recorded as an immutable
//! [`AuditEntry`] carrying the SHA-256 of the report's raw payload. The
//! first entry fixes the payload hash, so [`AuditTrail::verify_integrity`]
//! can later prove the report has not been altered since ingestion.
//!
//! ```text
//! NO_HISTORY ──record──▶ HAS_HISTORY ──record──▶ HAS_HISTORY …
//! ```
//!
//! # Example
//!
//! ```
//! use peptiq_audit::{actions, AuditTrail};
//! use peptiq_core::LabReport;
//!
//! let trail = AuditTrail::default();
//! let report = LabReport {
//!     id: "rpt_1".to_string(),
//!     batch_id: "B-1".to_string(),
//!     supplier_id: "acme".to_string(),
//!     lab_id: "lab-1".to_string(),
//!     test_date: chrono::Utc::now(),
//!     purity_percent: 98.0,
//!     endotoxin_level: 0.3,
//!     heavy_metals_ppm: 1.0,
//!     sample_size: 3,
//!     raw_payload: r#"{"batch_id":"B-1"}"#.to_string(),
//! };
//!
//! trail.record(&report, actions::INGESTED, None).unwrap();
//! assert!(trail.verify_integrity(&report).unwrap());
//! assert_eq!(trail.history("rpt_1").unwrap().len(), 1);
//! ```

pub mod entry;
pub mod hashing;
pub mod store;
pub mod trail;

pub use entry::{actions, AuditEntry, AuditHistoryEntry, Metadata};
pub use hashing::hash_payload;
pub use store::{AuditStore, InMemoryAuditStore};
pub use trail::AuditTrail;
