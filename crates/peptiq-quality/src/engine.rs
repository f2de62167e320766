//! Scoring engine
//!
//! Maps a validated report, a batch variance and a resolved config version
//! to a [`ScoreResult`]. The engine holds no state beyond a borrowed
//! registry and never performs I/O.

use crate::components;
use crate::flags::evaluate_flags;
use chrono::{DateTime, Utc};
use peptiq_core::{round2, LabReport, PeptiqError, ScoreBreakdown, ScoreResult};
use peptiq_registry::{ConfigRegistry, ScoringConfig};

/// Scores reports against the configs published in a registry
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine<'a> {
    registry: &'a ConfigRegistry,
}

impl<'a> ScoringEngine<'a> {
    /// Create an engine over a registry
    pub fn new(registry: &'a ConfigRegistry) -> Self {
        Self { registry }
    }

    /// Score a report as of the current time
    ///
    /// `version = None` uses the registry's default. An unknown version is
    /// returned as an error and never replaced.
    pub fn score(
        &self,
        report: &LabReport,
        batch_variance: f64,
        version: Option<&str>,
    ) -> Result<ScoreResult, PeptiqError> {
        self.score_at(report, batch_variance, version, Utc::now())
    }

    /// Score a report as of `now`
    ///
    /// Replaying a historical score means calling this with the version and
    /// instant the original score was computed under.
    pub fn score_at(
        &self,
        report: &LabReport,
        batch_variance: f64,
        version: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ScoreResult, PeptiqError> {
        let config = self.registry.resolve(version)?;
        Ok(score_with_config(report, batch_variance, config, now))
    }

    pub fn registry(&self) -> &'a ConfigRegistry {
        self.registry
    }
}

/// Score a report under an already resolved config
pub fn score_with_config(
    report: &LabReport,
    batch_variance: f64,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> ScoreResult {
    let elapsed = components::elapsed_days(report.test_date, now);

    let purity = components::purity_component(report.purity_percent, config.purity_weight);
    let endotoxin = components::threshold_penalty(
        report.endotoxin_level,
        config.endotoxin_threshold,
        config.endotoxin_max_penalty,
    );
    let heavy_metals = components::threshold_penalty(
        report.heavy_metals_ppm,
        config.heavy_metal_threshold,
        config.heavy_metal_max_penalty,
    );
    let variance = components::variance_penalty(batch_variance, config.variance_max_penalty);
    let time_decay = components::time_decay_penalty(
        elapsed,
        config.time_decay_days,
        config.time_decay_max_penalty,
    );

    let total = (purity + endotoxin + heavy_metals + variance + time_decay).clamp(0.0, 100.0);
    let confidence = components::confidence(
        report.sample_size,
        config.min_sample_size_for_full_confidence,
    );

    let result = ScoreResult {
        score: round2(total),
        confidence: round2(confidence),
        risk_flags: evaluate_flags(report, batch_variance, elapsed, config),
        scoring_version: config.version.clone(),
        breakdown: ScoreBreakdown {
            purity: round2(purity),
            endotoxin: round2(endotoxin),
            heavy_metals: round2(heavy_metals),
            variance: round2(variance),
            time_decay: round2(time_decay),
        },
    };

    tracing::debug!(
        report_id = %report.id,
        version = %result.scoring_version,
        score = result.score,
        confidence = result.confidence,
        flags = result.risk_flags.len(),
        "report scored"
    );

    result
}
