//! Risk flag evaluation
//!
//! Flags are evaluated independently and emitted in a fixed order, so the
//! same inputs always produce the same list.

use peptiq_core::{LabReport, RiskFlag};
use peptiq_registry::ScoringConfig;

/// Purity below this raises `LOW_PURITY`
pub const LOW_PURITY_THRESHOLD: f64 = 90.0;

/// Batch variance above this raises `HIGH_BATCH_VARIANCE`
pub const HIGH_VARIANCE_THRESHOLD: f64 = 2.5;

/// Evaluate every flag for a report
pub fn evaluate_flags(
    report: &LabReport,
    batch_variance: f64,
    elapsed_days: f64,
    config: &ScoringConfig,
) -> Vec<RiskFlag> {
    let checks = [
        (RiskFlag::LowPurity, report.purity_percent < LOW_PURITY_THRESHOLD),
        (RiskFlag::HighEndotoxin, report.endotoxin_level > config.endotoxin_threshold),
        (RiskFlag::HighHeavyMetals, report.heavy_metals_ppm > config.heavy_metal_threshold),
        (RiskFlag::HighBatchVariance, batch_variance > HIGH_VARIANCE_THRESHOLD),
        (
            RiskFlag::LowSampleSize,
            report.sample_size < config.min_sample_size_for_full_confidence,
        ),
        (RiskFlag::StaleTestData, elapsed_days > config.time_decay_days),
    ];

    checks
        .into_iter()
        .filter_map(|(flag, raised)| raised.then_some(flag))
        .collect()
}
