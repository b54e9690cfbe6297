use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::job::StoredJob;
use crate::pipeline::Pipeline;

#[derive(Debug, Default, Deserialize)]
pub struct JobFilters {
    /// Case-insensitive title substring.
    pub search: Option<String>,
}

pub async fn list(
    State(pipeline): State<Arc<Pipeline>>,
    Query(filters): Query<JobFilters>,
) -> Result<Json<Vec<StoredJob>>, AppError> {
    let mut jobs = pipeline.store().list_active().await?;
    if let Some(search) = filters.search.filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        jobs.retain(|stored| stored.job.title.to_lowercase().contains(&needle));
    }
    Ok(Json(jobs))
}

pub async fn get(
    State(pipeline): State<Arc<Pipeline>>,
    Path(id): Path<i64>,
) -> Result<Json<StoredJob>, AppError> {
    let job = pipeline.store().get(id).await?;
    Ok(Json(job))
}
