//! Audit entries
//!
//! Every lifecycle event on a report is one immutable [`AuditEntry`].
//! [`AuditHistoryEntry`] is the projection handed to callers that should not
//! see the raw payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form metadata attached to an entry
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Conventional action labels
pub mod actions {
    pub const INGESTED: &str = "INGESTED";
    pub const SCORED: &str = "SCORED";
    pub const REVIEWED: &str = "REVIEWED";
}

/// One immutable lifecycle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry ID (`aud_…`)
    pub id: String,

    /// Report the event belongs to
    pub report_id: String,

    /// Position in the report's history, starting at 0
    pub sequence: u64,

    /// SHA-256 hex of the report's raw payload at the time of the event
    pub payload_hash: String,

    /// When the event was recorded
    pub timestamp: DateTime<Utc>,

    /// Lab or source that produced the report
    pub source: String,

    /// Action label (INGESTED, SCORED, REVIEWED, ...)
    pub action: String,

    /// Copy of the raw payload
    pub raw_payload: String,

    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl AuditEntry {
    /// Read projection without the raw payload
    pub fn to_history(&self) -> AuditHistoryEntry {
        AuditHistoryEntry {
            action: self.action.clone(),
            timestamp: self.timestamp,
            hash: self.payload_hash.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Caller-facing view of an audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditHistoryEntry {
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}
