//! Shared application state
use crate::error::ApiError;
use crate::metrics::ApiMetrics;
use crate::pipeline::{ProcessedReport, ReportPipeline};
use peptiq_audit::{AuditTrail, InMemoryAuditStore};
use peptiq_core::{LabReport, ScoreResult};
use peptiq_quality::TrendDetector;
use peptiq_registry::ConfigRegistry;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub type SharedState = Arc<AppState>;

/// A report known to this process and its most recent score
#[derive(Debug, Clone, Serialize)]
pub struct StoredReport {
    pub report: LabReport,
    pub latest_score: Option<ScoreResult>,
}

pub struct AppState {
    pub registry: ConfigRegistry,
    pub audit: AuditTrail<InMemoryAuditStore>,
    pub metrics: ApiMetrics,
    pub trends: TrendDetector,
    reports: RwLock<HashMap<String, StoredReport>>,
}

impl AppState {
    pub fn new(registry: ConfigRegistry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            registry,
            audit: AuditTrail::default(),
            metrics: ApiMetrics::new()?,
            trends: TrendDetector::default(),
            reports: RwLock::new(HashMap::new()),
        })
    }

    pub fn pipeline(&self) -> ReportPipeline<'_, InMemoryAuditStore> {
        ReportPipeline::new(&self.registry, &self.audit)
    }

    /// Index an ingested report that has no score yet
    pub fn store_ingested(&self, report: &LabReport) -> Result<(), ApiError> {
        self.write()?.insert(
            report.id.clone(),
            StoredReport {
                report: report.clone(),
                latest_score: None,
            },
        );
        Ok(())
    }

    /// Index a scored report, replacing any earlier entry
    pub fn store_processed(&self, processed: &ProcessedReport) -> Result<(), ApiError> {
        self.write()?.insert(
            processed.report.id.clone(),
            StoredReport {
                report: processed.report.clone(),
                latest_score: Some(processed.score.clone()),
            },
        );
        Ok(())
    }

    /// A report and its latest score
    pub fn stored(&self, report_id: &str) -> Result<StoredReport, ApiError> {
        self.reports
            .read()
            .map_err(|_| poisoned())?
            .get(report_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("report '{}' not found", report_id)))
    }

    pub fn report(&self, report_id: &str) -> Result<LabReport, ApiError> {
        self.stored(report_id).map(|stored| stored.report)
    }

    /// Reports that have been scored at least once, with their latest score
    pub fn scored(&self) -> Result<Vec<(LabReport, ScoreResult)>, ApiError> {
        let reports = self.reports.read().map_err(|_| poisoned())?;
        let mut scored: Vec<(LabReport, ScoreResult)> = reports
            .values()
            .filter_map(|stored| {
                let score = stored.latest_score.clone()?;
                Some((stored.report.clone(), score))
            })
            .collect();
        scored.sort_by(|a, b| a.0.id.cmp(&b.0.id));
        Ok(scored)
    }

    pub fn scored_reports(&self) -> Result<Vec<LabReport>, ApiError> {
        Ok(self.scored()?.into_iter().map(|(report, _)| report).collect())
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, StoredReport>>, ApiError> {
        self.reports.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> ApiError {
    ApiError::Internal("report index lock poisoned".to_string())
}
