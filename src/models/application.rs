use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded application by one user to one stored job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub user: String,
    pub job_id: i64,
    pub status: String,
    pub match_score: f64,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub user: String,
    pub job_id: i64,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub match_score: f64,
}

fn default_status() -> String {
    "applied".to_string()
}

/// Counters returned by the auto-apply flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoApplySummary {
    pub total_found: usize,
    pub applied: usize,
    pub errors: usize,
}
