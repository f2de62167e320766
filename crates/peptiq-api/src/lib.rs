//! PeptIQ API: report pipeline and REST endpoints
//!
//! The pipeline in [`pipeline`] is usable without HTTP; the router built by
//! [`create_app`] exposes it together with audit, trend and metrics routes.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod pipeline;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use pipeline::{BatchFailure, BatchItem, BatchOutcome, PipelineError, ProcessedReport, ReportPipeline};
pub use state::{AppState, SharedState};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_app(state: SharedState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/v1/scoring/versions", get(handlers::list_versions))
        .route("/api/v1/reports", post(handlers::submit_report))
        .route("/api/v1/reports/{id}", get(handlers::get_report))
        .route("/api/v1/batches", post(handlers::submit_batch))
        .route("/api/v1/reports/{id}/review", post(handlers::review_report))
        .route("/api/v1/reports/{id}/history", get(handlers::report_history))
        .route("/api/v1/reports/{id}/integrity", get(handlers::verify_integrity))
        .route("/api/v1/reports/{id}/export", get(handlers::export_audit))
        .route("/api/v1/trends", get(handlers::trends))
        .route("/api/v1/suppliers", get(handlers::list_suppliers))
        .route("/api/v1/suppliers/{id}", get(handlers::get_supplier))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::cors(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ApiConfig) -> anyhow::Result<()> {
    let registry = config.build_registry()?;
    let state = Arc::new(AppState::new(registry).context("registering metrics")?);
    let app = create_app(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;

    tracing::info!("PeptIQ API listening on {}", config.addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
