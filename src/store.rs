//! Persistence boundary.
//!
//! The pipeline only ever talks to [`JobStore`]; the bundled
//! [`MemoryStore`] keeps everything in process memory, which is enough for
//! the service's live-search and auto-apply flows and for tests. A
//! database-backed implementation slots in behind the same trait.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::application::{Application, CreateApplication};
use crate::models::job::{Job, JobStatus, StoredJob};

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserts the job or updates the stored row matching its
    /// `(title, company, url)` key. Returns the stored row and whether it
    /// was newly created.
    async fn upsert(&self, job: Job) -> Result<(StoredJob, bool), AppError>;

    async fn list_active(&self) -> Result<Vec<StoredJob>, AppError>;

    async fn get(&self, id: i64) -> Result<StoredJob, AppError>;

    async fn has_applied(&self, user: &str, job_id: i64) -> Result<bool, AppError>;

    async fn record_application(
        &self,
        application: CreateApplication,
    ) -> Result<Application, AppError>;
}

#[derive(Default)]
struct Inner {
    jobs: BTreeMap<i64, StoredJob>,
    by_key: HashMap<(String, String, String), i64>,
    applications: Vec<Application>,
    next_job_id: i64,
    next_application_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn upsert(&self, job: Job) -> Result<(StoredJob, bool), AppError> {
        let mut inner = self.inner.write().await;
        let key = job.upsert_key();
        let now = Utc::now();
        if let Some(&id) = inner.by_key.get(&key) {
            let stored = inner
                .jobs
                .get_mut(&id)
                .ok_or_else(|| AppError::Internal(format!("job index points at missing id {id}")))?;
            stored.job = job;
            stored.status = JobStatus::Active;
            stored.updated_at = now;
            return Ok((stored.clone(), false));
        }
        inner.next_job_id += 1;
        let id = inner.next_job_id;
        let stored = StoredJob {
            id,
            status: JobStatus::Active,
            job,
            first_seen_at: now,
            updated_at: now,
        };
        inner.by_key.insert(key, id);
        inner.jobs.insert(id, stored.clone());
        Ok((stored, true))
    }

    async fn list_active(&self) -> Result<Vec<StoredJob>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .jobs
            .values()
            .filter(|j| j.status == JobStatus::Active)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<StoredJob, AppError> {
        let inner = self.inner.read().await;
        inner
            .jobs
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
    }

    async fn has_applied(&self, user: &str, job_id: i64) -> Result<bool, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .applications
            .iter()
            .any(|a| a.user == user && a.job_id == job_id))
    }

    async fn record_application(
        &self,
        application: CreateApplication,
    ) -> Result<Application, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.jobs.contains_key(&application.job_id) {
            return Err(AppError::NotFound(format!(
                "Job {} not found",
                application.job_id
            )));
        }
        inner.next_application_id += 1;
        let recorded = Application {
            id: inner.next_application_id,
            user: application.user,
            job_id: application.job_id,
            status: application.status,
            match_score: application.match_score,
            applied_at: Utc::now(),
        };
        inner.applications.push(recorded.clone());
        Ok(recorded)
    }
}
