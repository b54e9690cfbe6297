pub mod apply;
pub mod jobs;
pub mod matches;
pub mod search;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::pipeline::Pipeline;

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    let api = Router::new()
        // Live aggregation
        .route("/search/live", get(search::live))
        // Matching and auto-apply
        .route("/match", post(matches::create))
        .route("/apply/auto", post(apply::auto))
        // Stored jobs
        .route("/jobs", get(jobs::list))
        .route("/jobs/{id}", get(jobs::get))
        .with_state(pipeline);

    Router::new().nest("/api/v1", api)
}
