//! Integration tests for the audit trail: ordering, integrity and
//! concurrent recording.

use chrono::Utc;
use peptiq_audit::{actions, AuditStore, AuditTrail, InMemoryAuditStore};
use peptiq_core::LabReport;
use std::sync::Arc;
use std::thread;

fn report(id: &str, payload: &str) -> LabReport {
    LabReport {
        id: id.to_string(),
        batch_id: "TB500-3".to_string(),
        supplier_id: "coastal".to_string(),
        lab_id: "lab-2".to_string(),
        test_date: Utc::now(),
        purity_percent: 97.2,
        endotoxin_level: 0.4,
        heavy_metals_ppm: 0.9,
        sample_size: 3,
        raw_payload: payload.to_string(),
    }
}

// =============================================================================
// History
// =============================================================================

#[test]
fn test_history_after_n_records() {
    let trail = AuditTrail::default();
    let subject = report("rpt_hist", r#"{"batch_id":"TB500-3"}"#);

    assert!(trail.history(&subject.id).unwrap().is_empty());

    let labels = ["INGESTED", "SCORED", "REVIEWED", "SCORED", "REVIEWED"];
    for label in labels {
        trail.record(&subject, label, None).unwrap();
    }

    let history = trail.history(&subject.id).unwrap();
    let actions: Vec<&str> = history.iter().map(|h| h.action.as_str()).collect();
    assert_eq!(actions, labels.to_vec());
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_histories_are_per_report() {
    let trail = AuditTrail::default();
    let a = report("rpt_a", "a");
    let b = report("rpt_b", "b");

    trail.record(&a, actions::INGESTED, None).unwrap();
    trail.record(&b, actions::INGESTED, None).unwrap();
    trail.record(&a, actions::SCORED, None).unwrap();

    assert_eq!(trail.history("rpt_a").unwrap().len(), 2);
    assert_eq!(trail.history("rpt_b").unwrap().len(), 1);
}

#[test]
fn test_trail_over_runtime_selected_store() {
    let store: Box<dyn AuditStore> = Box::new(InMemoryAuditStore::new());
    let trail = AuditTrail::new(store);
    let subject = report("rpt_dyn", r#"{"batch_id":"TB500-3"}"#);

    trail.record(&subject, actions::INGESTED, None).unwrap();
    trail.record(&subject, actions::SCORED, None).unwrap();

    assert!(trail.verify_integrity(&subject).unwrap());
    assert_eq!(trail.history("rpt_dyn").unwrap().len(), 2);
    assert_eq!(trail.store().report_ids().unwrap(), vec!["rpt_dyn"]);
}

// =============================================================================
// Integrity
// =============================================================================

#[test]
fn test_any_byte_change_fails_integrity() {
    let trail = AuditTrail::default();
    let payload = r#"{"batch_id":"TB500-3","purity_percent":97.2,"sample_size":3}"#;
    let original = report("rpt_integrity", payload);
    trail.record(&original, actions::INGESTED, None).unwrap();

    assert!(trail.verify_integrity(&original).unwrap());

    let bytes = payload.as_bytes();
    for i in 0..bytes.len() {
        let mut altered = bytes.to_vec();
        altered[i] = if altered[i] == b'x' { b'y' } else { b'x' };
        let tampered = LabReport {
            raw_payload: String::from_utf8(altered).unwrap(),
            ..original.clone()
        };
        assert!(!trail.verify_integrity(&tampered).unwrap(), "byte {} went unnoticed", i);
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_records_same_report() {
    let trail = Arc::new(AuditTrail::new(InMemoryAuditStore::new()));
    let subject = Arc::new(report("rpt_shared", "{}"));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let trail = Arc::clone(&trail);
            let subject = Arc::clone(&subject);
            thread::spawn(move || {
                for i in 0..50 {
                    trail.record(&subject, format!("STEP_{}_{}", t, i), None).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let entries = trail.entries("rpt_shared").unwrap();
    assert_eq!(entries.len(), 400);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.sequence, i as u64);
    }

    // each writer's own entries stay in the order it issued them
    for t in 0..8 {
        let prefix = format!("STEP_{}_", t);
        let steps: Vec<u32> = entries
            .iter()
            .filter_map(|e| e.action.strip_prefix(&prefix))
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(steps, (0..50).collect::<Vec<u32>>());
    }
}

#[test]
fn test_concurrent_records_different_reports() {
    let trail = Arc::new(AuditTrail::default());

    let handles: Vec<_> = (0..16)
        .map(|t| {
            let trail = Arc::clone(&trail);
            thread::spawn(move || {
                let subject = report(&format!("rpt_{}", t), &format!("payload-{}", t));
                for _ in 0..25 {
                    trail.record(&subject, actions::SCORED, None).unwrap();
                }
                trail.verify_integrity(&subject).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }

    let ids = trail.store().report_ids().unwrap();
    assert_eq!(ids.len(), 16);
    for id in ids {
        assert_eq!(trail.history(&id).unwrap().len(), 25);
    }
}
