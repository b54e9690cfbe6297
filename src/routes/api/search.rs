use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};

use crate::error::AppError;
use crate::models::job::Job;
use crate::models::query::SearchQuery;
use crate::pipeline::Pipeline;

const DEFAULT_MAX_PER_SOURCE: usize = 10;

/// Live search across all configured sources.
///
/// Parameters are parsed leniently: the keyword string is the first
/// non-empty of `q`/`keywords`/`search`, a non-numeric `max` falls back to
/// the default, and `include_ats` accepts 1/true/yes/on (default on).
/// Partial source failures are invisible here; they only show up in logs.
pub async fn live(
    State(pipeline): State<Arc<Pipeline>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Job>>, AppError> {
    let query = parse_query(&params);
    let include_ats = params.get("include_ats").map_or(true, |v| truthy(v));
    Ok(Json(pipeline.live_search(&query, include_ats).await))
}

fn parse_query(params: &HashMap<String, String>) -> SearchQuery {
    let keywords = ["q", "keywords", "search"]
        .iter()
        .find_map(|key| params.get(*key).filter(|v| !v.is_empty()))
        .cloned()
        .unwrap_or_default();
    let country = params
        .get("country")
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| "India".to_string());
    let max_per_source = params
        .get("max")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_PER_SOURCE);

    SearchQuery {
        keywords,
        location: params.get("location").cloned().unwrap_or_default(),
        country,
        max_per_source,
        role_filter: None,
    }
}

fn truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
