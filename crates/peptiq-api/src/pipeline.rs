//! Report pipeline
//!
//! Runs the full flow for a submission:
//!
//! ```text
//! raw input → ingest → audit(INGESTED) → score → audit(SCORED)
//! ```
//!
//! Batches are processed item by item; one bad submission never stops the
//! rest.

use peptiq_audit::{actions, AuditEntry, AuditStore, AuditTrail, Metadata};
use peptiq_core::{LabReport, PeptiqError, RawInput, ScoreResult};
use peptiq_in::ValidationError;
use peptiq_quality::{batch_variances, ScoringEngine};
use peptiq_registry::ConfigRegistry;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// A report that made it through ingestion and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedReport {
    pub report: LabReport,
    pub score: ScoreResult,
}

/// Why a submission did not complete
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation failed: {}", peptiq_in::messages(.0).join("; "))]
    Validation(Vec<ValidationError>),

    /// Scoring failed after the report was ingested
    #[error("report {report_id} could not be scored: {source}")]
    Scoring {
        report_id: String,
        source: PeptiqError,
    },

    #[error("audit failure: {0}")]
    Audit(PeptiqError),
}

impl PipelineError {
    /// Plain messages suitable for showing a submitter
    pub fn messages(&self) -> Vec<String> {
        match self {
            PipelineError::Validation(errors) => peptiq_in::messages(errors),
            other => vec![other.to_string()],
        }
    }

    /// Report id, when the failure happened after ingestion
    pub fn report_id(&self) -> Option<&str> {
        match self {
            PipelineError::Scoring { report_id, .. } => Some(report_id),
            _ => None,
        }
    }
}

/// One processed item of a batch, keyed by its input position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: usize,
    #[serde(flatten)]
    pub processed: ProcessedReport,
}

/// One failed item of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    pub errors: Vec<String>,
    /// The report, when it was ingested before the failure
    #[serde(skip)]
    pub report: Option<LabReport>,
}

/// Result of a batch submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub processed: Vec<BatchItem>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failures.len()
    }
}

/// Ingests, scores and audits reports
pub struct ReportPipeline<'a, S: AuditStore> {
    registry: &'a ConfigRegistry,
    audit: &'a AuditTrail<S>,
}

impl<'a, S: AuditStore> ReportPipeline<'a, S> {
    pub fn new(registry: &'a ConfigRegistry, audit: &'a AuditTrail<S>) -> Self {
        Self { registry, audit }
    }

    /// Run one submission through the whole flow
    pub fn submit(
        &self,
        raw: &RawInput,
        batch_variance: f64,
        version: Option<&str>,
    ) -> Result<ProcessedReport, PipelineError> {
        let report = self.ingest(raw)?;
        let score = self.score(&report, batch_variance, version)?;
        Ok(ProcessedReport { report, score })
    }

    /// Validate a submission and record it as ingested
    pub fn ingest(&self, raw: &RawInput) -> Result<LabReport, PipelineError> {
        let report = peptiq_in::ingest(raw).map_err(PipelineError::Validation)?;
        self.audit
            .record(&report, actions::INGESTED, None)
            .map_err(PipelineError::Audit)?;
        Ok(report)
    }

    /// Score an ingested report and record the result
    pub fn score(
        &self,
        report: &LabReport,
        batch_variance: f64,
        version: Option<&str>,
    ) -> Result<ScoreResult, PipelineError> {
        let score = ScoringEngine::new(self.registry)
            .score(report, batch_variance, version)
            .map_err(|source| PipelineError::Scoring {
                report_id: report.id.clone(),
                source,
            })?;

        let mut metadata = Metadata::new();
        metadata.insert("scoring_version".to_string(), json!(score.scoring_version));
        metadata.insert("score".to_string(), json!(score.score));
        metadata.insert("confidence".to_string(), json!(score.confidence));
        metadata.insert("risk_flags".to_string(), json!(score.risk_flags));
        metadata.insert("batch_variance".to_string(), json!(batch_variance));

        self.audit
            .record(report, actions::SCORED, Some(metadata))
            .map_err(PipelineError::Audit)?;
        Ok(score)
    }

    /// Record a human review of a report
    pub fn review(
        &self,
        report: &LabReport,
        reviewer: &str,
        notes: Option<&str>,
    ) -> Result<AuditEntry, PipelineError> {
        let mut metadata = Metadata::new();
        metadata.insert("reviewer".to_string(), json!(reviewer));
        if let Some(notes) = notes {
            metadata.insert("notes".to_string(), json!(notes));
        }
        self.audit
            .record(report, actions::REVIEWED, Some(metadata))
            .map_err(PipelineError::Audit)
    }

    /// Process many submissions
    ///
    /// Valid reports are grouped by batch id and each is scored with its
    /// batch's purity standard deviation as the batch variance.
    pub fn submit_batch(&self, raws: &[RawInput], version: Option<&str>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let mut ingested: Vec<(usize, LabReport)> = Vec::new();

        for (index, raw) in raws.iter().enumerate() {
            match self.ingest(raw) {
                Ok(report) => ingested.push((index, report)),
                Err(err) => outcome.failures.push(failure(index, &err)),
            }
        }

        let variances = batch_variances(ingested.iter().map(|(_, r)| r));

        for (index, report) in ingested {
            let variance = variances.get(&report.batch_id).copied().unwrap_or(0.0);
            match self.score(&report, variance, version) {
                Ok(score) => outcome.processed.push(BatchItem {
                    index,
                    processed: ProcessedReport { report, score },
                }),
                Err(err) => outcome.failures.push(BatchFailure {
                    index,
                    report_id: Some(report.id.clone()),
                    errors: err.messages(),
                    report: Some(report),
                }),
            }
        }

        outcome.failures.sort_by_key(|f| f.index);
        tracing::info!(
            processed = outcome.processed.len(),
            failed = outcome.failures.len(),
            "batch processed"
        );
        outcome
    }
}

fn failure(index: usize, err: &PipelineError) -> BatchFailure {
    BatchFailure {
        index,
        report_id: err.report_id().map(str::to_string),
        errors: err.messages(),
        report: None,
    }
}
