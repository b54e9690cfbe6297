use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::application::AutoApplySummary;
use crate::pipeline::{MatchOptions, Pipeline};

#[derive(Debug, Deserialize)]
pub struct AutoApplyRequest {
    pub user: String,
    pub resume_text: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub max_per_source: Option<usize>,
}

/// Search, persist, and apply to every job at or above the threshold the
/// user has not already applied to. Per-job failures are counted in the
/// summary, never surfaced as an error.
pub async fn auto(
    State(pipeline): State<Arc<Pipeline>>,
    Json(request): Json<AutoApplyRequest>,
) -> Result<Json<AutoApplySummary>, AppError> {
    let options = MatchOptions {
        location: request.location,
        threshold: request.threshold,
        max_per_source: request.max_per_source,
        ..MatchOptions::default()
    };
    let summary = pipeline
        .auto_apply(&request.user, &request.resume_text, &options)
        .await?;
    Ok(Json(summary))
}
