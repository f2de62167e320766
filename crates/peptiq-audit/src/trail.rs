//! Audit trail
//!
//! Records lifecycle actions against reports and answers integrity and
//! history queries. The trail owns no global state: callers construct it
//! over a store and pass it where it is needed.

use crate::entry::{AuditEntry, AuditHistoryEntry, Metadata};
use crate::hashing::hash_payload;
use crate::store::{AuditStore, InMemoryAuditStore};
use chrono::Utc;
use peptiq_core::{ids, LabReport, PeptiqError};

/// Append-only audit trail over an [`AuditStore`]
#[derive(Debug)]
pub struct AuditTrail<S = InMemoryAuditStore> {
    store: S,
}

impl<S: AuditStore> AuditTrail<S> {
    /// Create a trail over a store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// SHA-256 hex of a payload
    pub fn hash(payload: &str) -> String {
        hash_payload(payload)
    }

    /// Record an action against a report
    ///
    /// Hashes the report's raw payload, stamps the current time and appends
    /// the entry to the report's history. Earlier entries are never touched.
    pub fn record(
        &self,
        report: &LabReport,
        action: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Result<AuditEntry, PeptiqError> {
        let action = action.into();
        let payload_hash = hash_payload(&report.raw_payload);

        let build = Box::new(move |sequence: u64| AuditEntry {
            id: ids::new_audit_id(),
            report_id: report.id.clone(),
            sequence,
            payload_hash,
            timestamp: Utc::now(),
            source: report.lab_id.clone(),
            action,
            raw_payload: report.raw_payload.clone(),
            metadata,
        });
        let entry = self.store.append(&report.id, build)?;

        tracing::info!(
            report_id = %entry.report_id,
            action = %entry.action,
            sequence = entry.sequence,
            "audit entry recorded"
        );
        Ok(entry)
    }

    /// Check a report's payload against the hash taken at its first entry
    ///
    /// `false` when the report has no history or the payload changed.
    pub fn verify_integrity(&self, report: &LabReport) -> Result<bool, PeptiqError> {
        let Some(first) = self.store.first(&report.id)? else {
            return Ok(false);
        };

        let valid = hash_payload(&report.raw_payload) == first.payload_hash;
        if !valid {
            tracing::warn!(report_id = %report.id, "payload does not match ingestion hash");
        }
        Ok(valid)
    }

    /// Action history for a report in insertion order; empty when unknown
    pub fn history(&self, report_id: &str) -> Result<Vec<AuditHistoryEntry>, PeptiqError> {
        Ok(self
            .store
            .entries(report_id)?
            .iter()
            .map(AuditEntry::to_history)
            .collect())
    }

    /// Full entries, raw payload included, for compliance review
    pub fn entries(&self, report_id: &str) -> Result<Vec<AuditEntry>, PeptiqError> {
        self.store.entries(report_id)
    }

    /// Export a report's entries as JSON Lines
    pub fn export_jsonl(&self, report_id: &str) -> Result<String, PeptiqError> {
        let lines = self
            .store
            .entries(report_id)?
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PeptiqError::Audit(format!("export failed: {}", e)))?;
        Ok(lines.join("\n"))
    }

    /// Clear every history.
    ///
    /// Test fixtures only; production code has no path that removes entries.
    pub fn reset(&self) -> Result<(), PeptiqError> {
        tracing::warn!("audit trail reset");
        self.store.clear()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl Default for AuditTrail<InMemoryAuditStore> {
    fn default() -> Self {
        Self::new(InMemoryAuditStore::new())
    }
}
