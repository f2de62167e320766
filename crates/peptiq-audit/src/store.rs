//! Audit storage
//!
//! [`AuditStore`] is the seam between the audit trail and wherever entries
//! are kept. Appends for one report id are serialized; appends for
//! different ids do not contend.

use crate::entry::AuditEntry;
use peptiq_core::PeptiqError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Builds an entry from the sequence number it will occupy
pub type EntryBuilder<'a> = Box<dyn FnOnce(u64) -> AuditEntry + 'a>;

/// Append-only storage of per-report audit histories
///
/// Object safe, so a store can be chosen at runtime as `Box<dyn AuditStore>`.
pub trait AuditStore: Send + Sync {
    /// Append an entry to a report's history
    ///
    /// `build` runs while the report's history is locked and receives the
    /// sequence number the entry will occupy. Histories are created on first
    /// append.
    fn append(&self, report_id: &str, build: EntryBuilder<'_>) -> Result<AuditEntry, PeptiqError>;

    /// First (ingestion-time) entry for a report
    fn first(&self, report_id: &str) -> Result<Option<AuditEntry>, PeptiqError>;

    /// Full history for a report in append order; empty when unknown
    fn entries(&self, report_id: &str) -> Result<Vec<AuditEntry>, PeptiqError>;

    /// Ids that have at least one entry
    fn report_ids(&self) -> Result<Vec<String>, PeptiqError>;

    /// Drop every history. Test fixtures only.
    fn clear(&self) -> Result<(), PeptiqError>;
}

type History = Arc<Mutex<Vec<AuditEntry>>>;

/// Process-local store with one lock per report id
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    histories: RwLock<HashMap<String, History>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn existing(&self, report_id: &str) -> Result<Option<History>, PeptiqError> {
        let histories = self.histories.read().map_err(|_| poisoned())?;
        Ok(histories.get(report_id).cloned())
    }

    fn history(&self, report_id: &str) -> Result<History, PeptiqError> {
        if let Some(history) = self.existing(report_id)? {
            return Ok(history);
        }
        let mut histories = self.histories.write().map_err(|_| poisoned())?;
        Ok(Arc::clone(histories.entry(report_id.to_string()).or_default()))
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, report_id: &str, build: EntryBuilder<'_>) -> Result<AuditEntry, PeptiqError> {
        let history = self.history(report_id)?;
        let mut entries = history.lock().map_err(|_| poisoned())?;
        let entry = build(entries.len() as u64);
        entries.push(entry.clone());
        Ok(entry)
    }

    fn first(&self, report_id: &str) -> Result<Option<AuditEntry>, PeptiqError> {
        match self.existing(report_id)? {
            Some(history) => {
                let entries = history.lock().map_err(|_| poisoned())?;
                Ok(entries.first().cloned())
            }
            None => Ok(None),
        }
    }

    fn entries(&self, report_id: &str) -> Result<Vec<AuditEntry>, PeptiqError> {
        match self.existing(report_id)? {
            Some(history) => {
                let entries = history.lock().map_err(|_| poisoned())?;
                Ok(entries.clone())
            }
            None => Ok(Vec::new()),
        }
    }

    fn report_ids(&self) -> Result<Vec<String>, PeptiqError> {
        let histories = self.histories.read().map_err(|_| poisoned())?;
        let mut ids: Vec<String> = histories.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn clear(&self) -> Result<(), PeptiqError> {
        self.histories.write().map_err(|_| poisoned())?.clear();
        Ok(())
    }
}

impl<T: AuditStore + ?Sized> AuditStore for Box<T> {
    fn append(&self, report_id: &str, build: EntryBuilder<'_>) -> Result<AuditEntry, PeptiqError> {
        (**self).append(report_id, build)
    }

    fn first(&self, report_id: &str) -> Result<Option<AuditEntry>, PeptiqError> {
        (**self).first(report_id)
    }

    fn entries(&self, report_id: &str) -> Result<Vec<AuditEntry>, PeptiqError> {
        (**self).entries(report_id)
    }

    fn report_ids(&self) -> Result<Vec<String>, PeptiqError> {
        (**self).report_ids()
    }

    fn clear(&self) -> Result<(), PeptiqError> {
        (**self).clear()
    }
}

fn poisoned() -> PeptiqError {
    PeptiqError::Audit("audit store lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(report_id: &str, sequence: u64, action: &str) -> AuditEntry {
        AuditEntry {
            id: format!("aud_{}", sequence),
            report_id: report_id.to_string(),
            sequence,
            payload_hash: "00".to_string(),
            timestamp: Utc::now(),
            source: "lab-1".to_string(),
            action: action.to_string(),
            raw_payload: "{}".to_string(),
            metadata: None,
        }
    }

    #[test]
    fn test_append_assigns_sequence() {
        let store = InMemoryAuditStore::new();
        let a = store.append("rpt_1", Box::new(|seq| entry("rpt_1", seq, "INGESTED"))).unwrap();
        let b = store.append("rpt_1", Box::new(|seq| entry("rpt_1", seq, "SCORED"))).unwrap();
        assert_eq!((a.sequence, b.sequence), (0, 1));
        assert_eq!(store.first("rpt_1").unwrap().unwrap().action, "INGESTED");
    }

    #[test]
    fn test_unknown_id_is_empty() {
        let store = InMemoryAuditStore::new();
        assert!(store.entries("rpt_missing").unwrap().is_empty());
        assert!(store.first("rpt_missing").unwrap().is_none());
        // reads never create a history
        assert!(store.report_ids().unwrap().is_empty());
    }

    #[test]
    fn test_boxed_store_behind_dyn() {
        let store: Box<dyn AuditStore> = Box::new(InMemoryAuditStore::new());
        store.append("rpt_1", Box::new(|seq| entry("rpt_1", seq, "INGESTED"))).unwrap();
        store.append("rpt_1", Box::new(|seq| entry("rpt_1", seq, "SCORED"))).unwrap();

        let actions: Vec<String> = store.entries("rpt_1").unwrap().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, vec!["INGESTED", "SCORED"]);
    }

    #[test]
    fn test_clear() {
        let store = InMemoryAuditStore::new();
        store.append("rpt_1", Box::new(|seq| entry("rpt_1", seq, "INGESTED"))).unwrap();
        store.append("rpt_2", Box::new(|seq| entry("rpt_2", seq, "INGESTED"))).unwrap();
        assert_eq!(store.report_ids().unwrap(), vec!["rpt_1", "rpt_2"]);

        store.clear().unwrap();
        assert!(store.report_ids().unwrap().is_empty());
    }
}
