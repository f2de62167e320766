//! Identifier generation
//!
//! Ids are 128-bit random UUIDs with a short type prefix, so concurrent
//! ingestion never collides.
use uuid::Uuid;

/// New id for an ingested lab report
pub fn new_report_id() -> String {
    format!("rpt_{}", Uuid::new_v4().simple())
}

/// New id for an audit entry
pub fn new_audit_id() -> String {
    format!("aud_{}", Uuid::new_v4().simple())
}
