//! Scoring parameter sets
//!
//! Every weight and threshold the scoring engine reads lives here, so a
//! version string fully determines how a report is scored.

use peptiq_core::PeptiqError;
use serde::{Deserialize, Serialize};

/// Named, versioned bundle of scoring weights and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Version string (e.g., "v1.0")
    pub version: String,

    // === Purity ===

    /// Multiplier applied to purity percent
    pub purity_weight: f64,

    // === Contaminants ===

    /// Endotoxin level above which a penalty applies (EU/mg)
    pub endotoxin_threshold: f64,

    /// Penalty at or beyond twice the endotoxin threshold
    pub endotoxin_max_penalty: f64,

    /// Heavy metals concentration above which a penalty applies (ppm)
    pub heavy_metal_threshold: f64,

    /// Penalty at or beyond twice the heavy metal threshold
    pub heavy_metal_max_penalty: f64,

    // === Batch consistency ===

    /// Penalty at or beyond the variance saturation point
    pub variance_max_penalty: f64,

    // === Freshness ===

    /// Days a test result stays fresh
    pub time_decay_days: f64,

    /// Penalty at or beyond twice the decay window
    pub time_decay_max_penalty: f64,

    // === Reliability ===

    /// Sample size that earns full confidence
    pub min_sample_size_for_full_confidence: u32,
}

impl ScoringConfig {
    /// The first published parameter set
    pub fn v1_0() -> Self {
        Self {
            version: "v1.0".to_string(),
            purity_weight: 0.6,
            endotoxin_threshold: 5.0,
            endotoxin_max_penalty: 15.0,
            heavy_metal_threshold: 10.0,
            heavy_metal_max_penalty: 10.0,
            variance_max_penalty: 5.0,
            time_decay_days: 180.0,
            time_decay_max_penalty: 10.0,
            min_sample_size_for_full_confidence: 3,
        }
    }

    /// Load a parameter set from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, PeptiqError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| PeptiqError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter sets that would make the formulas undefined
    pub fn validate(&self) -> Result<(), PeptiqError> {
        let invalid = |reason: String| PeptiqError::InvalidConfig {
            version: self.version.clone(),
            reason,
        };

        if self.version.trim().is_empty() {
            return Err(invalid("version must not be empty".to_string()));
        }

        let positive = [
            ("endotoxin_threshold", self.endotoxin_threshold),
            ("heavy_metal_threshold", self.heavy_metal_threshold),
            ("time_decay_days", self.time_decay_days),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{} must be a positive number, got {}", name, value)));
            }
        }

        let non_negative = [
            ("purity_weight", self.purity_weight),
            ("endotoxin_max_penalty", self.endotoxin_max_penalty),
            ("heavy_metal_max_penalty", self.heavy_metal_max_penalty),
            ("variance_max_penalty", self.variance_max_penalty),
            ("time_decay_max_penalty", self.time_decay_max_penalty),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be a non-negative number, got {}", name, value)));
            }
        }

        if self.min_sample_size_for_full_confidence == 0 {
            return Err(invalid("min_sample_size_for_full_confidence must be at least 1".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_0_is_valid() {
        let config = ScoringConfig::v1_0();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_sample_size_for_full_confidence, 3);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
version: "v2.0-strict"
purity_weight: 0.7
endotoxin_threshold: 2.5
endotoxin_max_penalty: 20
heavy_metal_threshold: 5
heavy_metal_max_penalty: 12
variance_max_penalty: 6
time_decay_days: 90
time_decay_max_penalty: 8
min_sample_size_for_full_confidence: 5
"#;
        let config = ScoringConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "v2.0-strict");
        assert_eq!(config.endotoxin_threshold, 2.5);
        assert_eq!(config.min_sample_size_for_full_confidence, 5);
    }

    #[test]
    fn test_from_yaml_missing_field() {
        let err = ScoringConfig::from_yaml("version: v3\npurity_weight: 0.5\n").unwrap_err();
        assert!(matches!(err, PeptiqError::ConfigParse(_)));
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let mut config = ScoringConfig::v1_0();
        config.endotoxin_threshold = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("endotoxin_threshold"));
    }

    #[test]
    fn test_zero_min_sample_size_rejected() {
        let mut config = ScoringConfig::v1_0();
        config.min_sample_size_for_full_confidence = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_penalty_rejected() {
        let mut config = ScoringConfig::v1_0();
        config.variance_max_penalty = -1.0;
        assert!(config.validate().is_err());
    }
}
