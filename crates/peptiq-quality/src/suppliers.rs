//! Supplier quality summaries
//!
//! Aggregates scored reports per supplier: how many were tested, their
//! average purity and score, and how many passed.

use peptiq_core::{round1, round2, LabReport, RiskFlag, ScoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flags that fail a report; reliability flags (sample size, staleness) do not
pub const FAILING_FLAGS: [RiskFlag; 3] = [
    RiskFlag::LowPurity,
    RiskFlag::HighEndotoxin,
    RiskFlag::HighHeavyMetals,
];

/// Quality figures for one supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierSummary {
    pub supplier_id: String,
    pub sample_count: usize,
    /// Mean purity percent, one decimal
    pub avg_purity: f64,
    /// Mean score, two decimals
    pub avg_score: f64,
    /// Share of reports without a failing flag, 0 to 1
    pub pass_rate: f64,
    pub batch_count: usize,
}

/// True when a score carries none of [`FAILING_FLAGS`]
pub fn passes(score: &ScoreResult) -> bool {
    !FAILING_FLAGS.iter().any(|flag| score.has_flag(*flag))
}

/// One summary per supplier, ordered by supplier id
pub fn summarize_suppliers(scored: &[(LabReport, ScoreResult)]) -> Vec<SupplierSummary> {
    let mut groups: BTreeMap<&str, Vec<&(LabReport, ScoreResult)>> = BTreeMap::new();
    for item in scored {
        groups.entry(item.0.supplier_id.as_str()).or_default().push(item);
    }

    groups
        .into_iter()
        .map(|(supplier, items)| {
            let n = items.len() as f64;
            let purity: f64 = items.iter().map(|(r, _)| r.purity_percent).sum();
            let score: f64 = items.iter().map(|(_, s)| s.score).sum();
            let passed = items.iter().filter(|(_, s)| passes(s)).count();
            let mut batches: Vec<&str> = items.iter().map(|(r, _)| r.batch_id.as_str()).collect();
            batches.sort_unstable();
            batches.dedup();

            SupplierSummary {
                supplier_id: supplier.to_string(),
                sample_count: items.len(),
                avg_purity: round1(purity / n),
                avg_score: round2(score / n),
                pass_rate: round2(passed as f64 / n),
                batch_count: batches.len(),
            }
        })
        .collect()
}
