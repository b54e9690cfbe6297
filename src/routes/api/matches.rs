use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::error::AppError;
use crate::matching::MatchResult;
use crate::models::job::StoredJob;
use crate::pipeline::{MatchOptions, Pipeline};

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Minimum match score in [0, 100].
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub max_per_source: Option<usize>,
}

/// Refresh stored jobs from all sources, then rank them against the
/// resume. An empty `resume_text` is a bad request; everything else is
/// best effort.
pub async fn create(
    State(pipeline): State<Arc<Pipeline>>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<Vec<MatchResult<StoredJob>>>, AppError> {
    let options = MatchOptions {
        keywords: request.keywords,
        location: request.location,
        country: request.country,
        threshold: request.threshold,
        max_per_source: request.max_per_source,
    };
    let matches = pipeline.match_resume(&request.resume_text, &options).await?;
    Ok(Json(matches))
}
