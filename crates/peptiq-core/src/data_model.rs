//! Data Model: LabReport, ScoreResult, RiskFlag
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Untrusted key/value input as submitted by a lab or customer
pub type RawInput = serde_json::Map<String, serde_json::Value>;

/// A validated lab test report
///
/// Built only by ingestion. `raw_payload` is the exact serialized input that
/// was hashed when the report was first audited; it is never re-derived from
/// the typed fields, and a changed payload needs a new report id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReport {
    /// Unique report ID (`rpt_…`)
    pub id: String,

    /// Production batch the sample came from
    pub batch_id: String,

    /// Supplier that sold the sample
    pub supplier_id: String,

    /// Laboratory that ran the test
    pub lab_id: String,

    /// When the test was performed
    pub test_date: DateTime<Utc>,

    /// Purity in percent (0-100)
    pub purity_percent: f64,

    /// Endotoxin level (EU/mg, >= 0)
    pub endotoxin_level: f64,

    /// Heavy metals concentration (ppm, >= 0)
    pub heavy_metals_ppm: f64,

    /// Number of samples tested (>= 1)
    pub sample_size: u32,

    /// Canonical serialized input captured at ingestion
    pub raw_payload: String,
}

/// A discrete quality or reliability concern raised during scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    LowPurity,
    HighEndotoxin,
    HighHeavyMetals,
    HighBatchVariance,
    LowSampleSize,
    StaleTestData,
}

impl RiskFlag {
    /// Token used in reports and audit metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFlag::LowPurity => "LOW_PURITY",
            RiskFlag::HighEndotoxin => "HIGH_ENDOTOXIN",
            RiskFlag::HighHeavyMetals => "HIGH_HEAVY_METALS",
            RiskFlag::HighBatchVariance => "HIGH_BATCH_VARIANCE",
            RiskFlag::LowSampleSize => "LOW_SAMPLE_SIZE",
            RiskFlag::StaleTestData => "STALE_TEST_DATA",
        }
    }
}

impl std::fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-component contributions to a score, each rounded to two decimals
///
/// `purity` is the only positive contributor; the penalties are zero or
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub purity: f64,
    pub endotoxin: f64,
    pub heavy_metals: f64,
    pub variance: f64,
    pub time_decay: f64,
}

/// Result of scoring one report under one config version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Final score (0-100, two decimals)
    pub score: f64,

    /// Reliability annotation from sample size (0-1, two decimals)
    pub confidence: f64,

    /// Raised flags in evaluation order
    pub risk_flags: Vec<RiskFlag>,

    /// Config version the score was computed under
    pub scoring_version: String,

    /// Component contributions
    pub breakdown: ScoreBreakdown,
}

impl ScoreResult {
    /// Check whether a given flag was raised
    pub fn has_flag(&self, flag: RiskFlag) -> bool {
        self.risk_flags.contains(&flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_flag_serde_tokens() {
        let json = serde_json::to_string(&vec![RiskFlag::LowPurity, RiskFlag::StaleTestData]).unwrap();
        assert_eq!(json, r#"["LOW_PURITY","STALE_TEST_DATA"]"#);

        let flag: RiskFlag = serde_json::from_str("\"HIGH_HEAVY_METALS\"").unwrap();
        assert_eq!(flag, RiskFlag::HighHeavyMetals);
        assert_eq!(flag.to_string(), "HIGH_HEAVY_METALS");
    }
}
