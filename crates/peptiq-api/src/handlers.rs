//! API Handlers
use crate::error::ApiError;
use crate::pipeline::{BatchOutcome, PipelineError, ProcessedReport};
use crate::state::{SharedState, StoredReport};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use peptiq_audit::AuditHistoryEntry;
use peptiq_core::{RawInput, PEPTIQ_VERSION};
use peptiq_quality::{summarize_suppliers, SupplierSummary, TrendSummary};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    pub report: RawInput,
    #[serde(default)]
    pub batch_variance: f64,
    pub scoring_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitBatchRequest {
    pub reports: Vec<RawInput>,
    pub scoring_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub reviewer: String,
    pub notes: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "peptiq-api",
        "version": PEPTIQ_VERSION,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn list_versions(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "versions": state.registry.list_versions(),
        "default": state.registry.default_version(),
    }))
}

pub async fn submit_report(
    State(state): State<SharedState>,
    Json(req): Json<SubmitReportRequest>,
) -> Result<(StatusCode, Json<ProcessedReport>), ApiError> {
    if req.batch_variance < 0.0 {
        return Err(ApiError::BadRequest(format!(
            "batch_variance must not be negative (got {})",
            req.batch_variance
        )));
    }

    let pipeline = state.pipeline();
    let report = pipeline.ingest(&req.report).inspect_err(|err| {
        if matches!(err, PipelineError::Validation(_)) {
            state.metrics.validation_failures.inc();
        }
    })?;
    state.metrics.reports_ingested.inc();
    state.store_ingested(&report)?;

    let score = pipeline.score(&report, req.batch_variance, req.scoring_version.as_deref())?;
    state.metrics.reports_scored.inc();

    let processed = ProcessedReport { report, score };
    state.store_processed(&processed)?;
    Ok((StatusCode::CREATED, Json(processed)))
}

pub async fn submit_batch(
    State(state): State<SharedState>,
    Json(req): Json<SubmitBatchRequest>,
) -> Result<Json<BatchOutcome>, ApiError> {
    let outcome = state
        .pipeline()
        .submit_batch(&req.reports, req.scoring_version.as_deref());

    for item in &outcome.processed {
        state.store_processed(&item.processed)?;
    }
    for report in outcome.failures.iter().filter_map(|f| f.report.as_ref()) {
        state.store_ingested(report)?;
    }

    let rejected = outcome.failures.iter().filter(|f| f.report_id.is_none()).count() as u64;
    let scored = outcome.processed.len() as u64;
    state.metrics.validation_failures.inc_by(rejected);
    state
        .metrics
        .reports_ingested
        .inc_by(outcome.total() as u64 - rejected);
    state.metrics.reports_scored.inc_by(scored);

    Ok(Json(outcome))
}

pub async fn get_report(
    State(state): State<SharedState>,
    Path(report_id): Path<String>,
) -> Result<Json<StoredReport>, ApiError> {
    Ok(Json(state.stored(&report_id)?))
}

pub async fn review_report(
    State(state): State<SharedState>,
    Path(report_id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<AuditHistoryEntry>), ApiError> {
    let reviewer = req.reviewer.trim();
    if reviewer.is_empty() {
        return Err(ApiError::BadRequest("reviewer must not be empty".to_string()));
    }

    let report = state.report(&report_id)?;
    let entry = state
        .pipeline()
        .review(&report, reviewer, req.notes.as_deref())?;
    Ok((StatusCode::CREATED, Json(entry.to_history())))
}

pub async fn report_history(
    State(state): State<SharedState>,
    Path(report_id): Path<String>,
) -> Result<Json<Vec<AuditHistoryEntry>>, ApiError> {
    Ok(Json(state.audit.history(&report_id)?))
}

pub async fn verify_integrity(
    State(state): State<SharedState>,
    Path(report_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let report = state.report(&report_id)?;
    let valid = state.audit.verify_integrity(&report)?;
    if !valid {
        state.metrics.integrity_failures.inc();
        tracing::warn!(report_id = %report_id, "integrity check failed");
    }
    Ok(Json(json!({ "report_id": report_id, "valid": valid })))
}

/// Full audit entries for one report as JSON Lines
pub async fn export_audit(
    State(state): State<SharedState>,
    Path(report_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.report(&report_id)?;
    let body = state.audit.export_jsonl(&report_id)?;
    Ok(([(header::CONTENT_TYPE, "application/x-ndjson")], body))
}

pub async fn trends(State(state): State<SharedState>) -> Result<Json<TrendSummary>, ApiError> {
    let reports = state.scored_reports()?;
    Ok(Json(state.trends.summarize(&reports)))
}

pub async fn list_suppliers(
    State(state): State<SharedState>,
    Query(query): Query<SupplierQuery>,
) -> Result<Json<Value>, ApiError> {
    if query.page == 0 {
        return Err(ApiError::BadRequest("page starts at 1".to_string()));
    }
    if query.page_size == 0 || query.page_size > MAX_PAGE_SIZE {
        return Err(ApiError::BadRequest(format!(
            "page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let summaries = summarize_suppliers(&state.scored()?);
    let total = summaries.len();
    let page: Vec<SupplierSummary> = summaries
        .into_iter()
        .skip((query.page - 1).saturating_mul(query.page_size))
        .take(query.page_size)
        .collect();

    Ok(Json(json!({
        "suppliers": page,
        "page": query.page,
        "page_size": query.page_size,
        "total": total,
    })))
}

pub async fn get_supplier(
    State(state): State<SharedState>,
    Path(supplier_id): Path<String>,
) -> Result<Json<SupplierSummary>, ApiError> {
    let scored: Vec<_> = state
        .scored()?
        .into_iter()
        .filter(|(report, _)| report.supplier_id == supplier_id)
        .collect();

    summarize_suppliers(&scored)
        .into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("supplier '{}' not found", supplier_id)))
}

pub async fn metrics(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
