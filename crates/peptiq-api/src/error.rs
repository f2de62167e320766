//! HTTP error mapping
use crate::pipeline::PipelineError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use peptiq_core::PeptiqError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl From<PeptiqError> for ApiError {
    fn from(err: PeptiqError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Pipeline(PipelineError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "validation_failed",
                    "errors": peptiq_in::messages(errors),
                    "details": errors,
                }),
            ),
            ApiError::Pipeline(err @ PipelineError::Scoring { source, .. }) if source.is_not_found() => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "scoring_version_not_found",
                    "message": source.to_string(),
                    "report_id": err.report_id(),
                }),
            ),
            ApiError::Pipeline(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "pipeline_failed", "message": err.to_string() }),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "bad_request", "message": msg }),
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "not_found", "message": msg }),
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal", "message": msg }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
