//! Batch statistics and supplier trend detection
//!
//! Descriptive statistics over many reports: the batch variance fed into
//! scoring, and the supplier-level alerts reviewed by the quality team.

use peptiq_core::{round1, LabReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sample standard deviation of purity percentages
///
/// Returns 0 for fewer than two values.
pub fn batch_variance(purities: &[f64]) -> f64 {
    if purities.len() < 2 {
        return 0.0;
    }
    let n = purities.len() as f64;
    let mean = purities.iter().sum::<f64>() / n;
    let sum_sq: f64 = purities.iter().map(|p| (p - mean).powi(2)).sum();
    (sum_sq / (n - 1.0)).sqrt()
}

/// Batch variance for every batch in a set of reports
pub fn batch_variances<'a, I>(reports: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a LabReport>,
{
    let mut purities: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for report in reports {
        purities
            .entry(report.batch_id.clone())
            .or_default()
            .push(report.purity_percent);
    }
    purities
        .into_iter()
        .map(|(batch, values)| (batch, batch_variance(&values)))
        .collect()
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Critical,
}

/// A supplier whose recent purity dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecliningSupplier {
    pub supplier_id: String,
    pub previous_avg: f64,
    pub recent_avg: f64,
    pub drop: f64,
    pub sample_count: usize,
    pub severity: Severity,
}

/// A supplier with a wide purity spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceIssue {
    pub supplier_id: String,
    pub mean: f64,
    pub std_dev: f64,
    pub range: f64,
    pub sample_count: usize,
    pub severity: Severity,
}

/// A single report with an elevated contaminant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyConcern {
    pub report_id: String,
    pub supplier_id: String,
    pub batch_id: String,
    pub concern: String,
    pub severity: Severity,
}

/// Everything the detector found in one pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendSummary {
    pub total_reports: usize,
    pub declining: Vec<DecliningSupplier>,
    pub variance: Vec<VarianceIssue>,
    pub safety: Vec<SafetyConcern>,
}

impl TrendSummary {
    /// Alerts that need action today
    pub fn critical_count(&self) -> usize {
        self.declining.iter().filter(|d| d.severity == Severity::Critical).count()
            + self.safety.iter().filter(|s| s.severity == Severity::Critical).count()
    }
}

/// Thresholds for supplier trend alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendDetector {
    /// Purity drop (points) that raises a warning
    pub decline_warning: f64,
    /// Purity drop (points) that is critical
    pub decline_critical: f64,
    /// Purity range (points) across a supplier's reports that raises a warning
    pub range_warning: f64,
    /// Endotoxin level (EU/mg) that raises a warning; twice this is critical
    pub endotoxin_alert: f64,
}

impl Default for TrendDetector {
    fn default() -> Self {
        Self {
            decline_warning: 2.0,
            decline_critical: 5.0,
            range_warning: 5.0,
            endotoxin_alert: 1.0,
        }
    }
}

/// Reports needed before a supplier's decline is judged
const MIN_DECLINE_SAMPLES: usize = 4;

/// Reports needed before a supplier's spread is judged
const MIN_VARIANCE_SAMPLES: usize = 3;

/// Reports averaged in each comparison window
const WINDOW: usize = 3;

impl TrendDetector {
    /// Run every detector
    pub fn summarize(&self, reports: &[LabReport]) -> TrendSummary {
        TrendSummary {
            total_reports: reports.len(),
            declining: self.detect_declining_suppliers(reports),
            variance: self.detect_variance_issues(reports),
            safety: self.detect_safety_concerns(reports),
        }
    }

    /// Compare each supplier's newest reports with the ones just before
    pub fn detect_declining_suppliers(&self, reports: &[LabReport]) -> Vec<DecliningSupplier> {
        let mut declining = Vec::new();

        for (supplier, mut group) in by_supplier(reports) {
            if group.len() < MIN_DECLINE_SAMPLES {
                continue;
            }
            // newest first; id breaks ties so the order is stable
            group.sort_by(|a, b| b.test_date.cmp(&a.test_date).then_with(|| a.id.cmp(&b.id)));

            let recent = mean(group.iter().take(WINDOW).map(|r| r.purity_percent));
            let previous = mean(group.iter().skip(WINDOW).take(WINDOW).map(|r| r.purity_percent));
            let drop = previous - recent;

            if drop > self.decline_warning {
                declining.push(DecliningSupplier {
                    supplier_id: supplier,
                    previous_avg: round1(previous),
                    recent_avg: round1(recent),
                    drop: round1(drop),
                    sample_count: group.len(),
                    severity: if drop > self.decline_critical {
                        Severity::Critical
                    } else {
                        Severity::Warning
                    },
                });
            }
        }

        declining
    }

    /// Find suppliers whose purity varies widely between reports
    pub fn detect_variance_issues(&self, reports: &[LabReport]) -> Vec<VarianceIssue> {
        let mut issues = Vec::new();

        for (supplier, group) in by_supplier(reports) {
            if group.len() < MIN_VARIANCE_SAMPLES {
                continue;
            }
            let purities: Vec<f64> = group.iter().map(|r| r.purity_percent).collect();
            let max = purities.iter().copied().fold(f64::MIN, f64::max);
            let min = purities.iter().copied().fold(f64::MAX, f64::min);
            let range = max - min;

            if range > self.range_warning {
                issues.push(VarianceIssue {
                    supplier_id: supplier,
                    mean: round1(mean(purities.iter().copied())),
                    std_dev: round1(batch_variance(&purities)),
                    range: round1(range),
                    sample_count: group.len(),
                    severity: Severity::Warning,
                });
            }
        }

        issues
    }

    /// Flag individual reports with elevated endotoxin
    pub fn detect_safety_concerns(&self, reports: &[LabReport]) -> Vec<SafetyConcern> {
        reports
            .iter()
            .filter(|r| r.endotoxin_level > self.endotoxin_alert)
            .map(|r| SafetyConcern {
                report_id: r.id.clone(),
                supplier_id: r.supplier_id.clone(),
                batch_id: r.batch_id.clone(),
                concern: format!("High endotoxin: {} EU/mg", r.endotoxin_level),
                severity: if r.endotoxin_level > self.endotoxin_alert * 2.0 {
                    Severity::Critical
                } else {
                    Severity::Warning
                },
            })
            .collect()
    }
}

fn by_supplier(reports: &[LabReport]) -> BTreeMap<String, Vec<&LabReport>> {
    let mut groups: BTreeMap<String, Vec<&LabReport>> = BTreeMap::new();
    for report in reports {
        groups.entry(report.supplier_id.clone()).or_default().push(report);
    }
    groups
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
