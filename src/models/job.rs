use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Employment type attached to a normalized job record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

/// Lifecycle status of a stored job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Active,
    Expired,
    Filled,
}

/// A job listing normalized out of one external source.
///
/// `application_url` is the record's identity: the aggregator deduplicates
/// on it, and the store's upsert key includes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub title: String,
    pub company_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub application_url: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub source: String,
}

impl Job {
    /// A record without a usable title or application URL carries no
    /// identity and is dropped during aggregation.
    pub fn has_required_fields(&self) -> bool {
        !self.title.trim().is_empty() && !self.application_url.trim().is_empty()
    }

    /// Upsert key: two records with the same title, company, and URL are
    /// the same stored row.
    pub fn upsert_key(&self) -> (String, String, String) {
        (
            self.title.clone(),
            self.company_name.clone(),
            self.application_url.clone(),
        )
    }
}

/// Persisted view of a job, as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredJob {
    pub id: i64,
    pub status: JobStatus,
    #[serde(flatten)]
    pub job: Job,
    pub first_seen_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
