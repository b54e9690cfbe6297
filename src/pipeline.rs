//! End-to-end flows composing the aggregator, store, scorer, and notifier.
//!
//! Fetching is the concurrent phase; everything after it (scoring,
//! upserts, application bookkeeping) runs sequentially on the results, so
//! CPU-bound scoring never sits inside a fetch task.

use std::sync::Arc;

use tracing::warn;

use crate::aggregator::{Aggregator, RoleFilter};
use crate::error::AppError;
use crate::matching::{DEFAULT_MATCH_THRESHOLD, MatchResult, MatchScorer};
use crate::models::application::{AutoApplySummary, CreateApplication};
use crate::models::company::CompanyEntry;
use crate::models::job::{Job, StoredJob};
use crate::models::query::SearchQuery;
use crate::notify::Notifier;
use crate::store::JobStore;
use crate::text::SkillExtractor;

/// Search keywords used when a resume yields no recognizable skills.
pub const DEFAULT_SEARCH_KEYWORDS: &str = "software engineer developer sde";

/// Auto-apply fans out with a smaller per-source cap than plain matching.
pub const AUTO_APPLY_MAX_PER_SOURCE: usize = 5;

/// Caller knobs for the match and auto-apply flows. Everything is
/// optional; defaults follow the resume-driven behavior (keywords from
/// extracted skills, location/country "India").
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub threshold: Option<f64>,
    pub max_per_source: Option<usize>,
}

pub struct Pipeline {
    aggregator: Aggregator,
    catalog: Vec<CompanyEntry>,
    store: Arc<dyn JobStore>,
    notifier: Arc<dyn Notifier>,
    scorer: MatchScorer,
    extractor: SkillExtractor,
    role_filter: RoleFilter,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        aggregator: Aggregator,
        catalog: Vec<CompanyEntry>,
        store: Arc<dyn JobStore>,
        notifier: Arc<dyn Notifier>,
        scorer: MatchScorer,
        extractor: SkillExtractor,
        role_filter: RoleFilter,
    ) -> Self {
        Self {
            aggregator,
            catalog,
            store,
            notifier,
            scorer,
            extractor,
            role_filter,
        }
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Live aggregation without persistence.
    pub async fn live_search(&self, query: &SearchQuery, include_ats: bool) -> Vec<Job> {
        let catalog: &[CompanyEntry] = if include_ats { &self.catalog } else { &[] };
        self.aggregator.search(query, catalog).await
    }

    /// Refreshes the store from all sources, then ranks the active stored
    /// jobs against the resume.
    pub async fn match_resume(
        &self,
        resume_text: &str,
        options: &MatchOptions,
    ) -> Result<Vec<MatchResult<StoredJob>>, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::BadRequest(
                "resume_text must not be empty".to_string(),
            ));
        }
        let query = self.search_query(resume_text, options, SearchQuery::default().max_per_source);
        let found = self.aggregator.search(&query, &self.catalog).await;
        self.store_all(found).await;

        let threshold = options.threshold.unwrap_or(DEFAULT_MATCH_THRESHOLD);
        let stored = self.store.list_active().await?;
        let candidates: Vec<StoredJob> = stored
            .into_iter()
            .filter(|s| self.role_filter.matches(&s.job.title))
            .collect();
        Ok(self.scorer.rank(resume_text, candidates, threshold))
    }

    /// Searches, persists, and applies to every job at or above the
    /// threshold that the user has not already applied to. A failure on
    /// one job is counted and skipped; it never aborts the sweep.
    pub async fn auto_apply(
        &self,
        user: &str,
        resume_text: &str,
        options: &MatchOptions,
    ) -> Result<AutoApplySummary, AppError> {
        if user.trim().is_empty() {
            return Err(AppError::BadRequest("user must not be empty".to_string()));
        }
        if resume_text.trim().is_empty() {
            return Err(AppError::BadRequest(
                "resume_text must not be empty".to_string(),
            ));
        }

        let query = self.search_query(resume_text, options, AUTO_APPLY_MAX_PER_SOURCE);
        let found = self.aggregator.search(&query, &self.catalog).await;
        let threshold = options.threshold.unwrap_or(DEFAULT_MATCH_THRESHOLD);
        let mut summary = AutoApplySummary {
            total_found: found.len(),
            ..AutoApplySummary::default()
        };

        for job in found {
            let stored = match self.store.upsert(job).await {
                Ok((stored, _)) => stored,
                Err(error) => {
                    warn!(%error, "auto-apply: failed to store job");
                    summary.errors += 1;
                    continue;
                }
            };
            let score =
                self.scorer
                    .score(resume_text, &stored.job.description, &stored.job.requirements);
            if score < threshold {
                continue;
            }
            match self.store.has_applied(user, stored.id).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(error) => {
                    warn!(%error, job_id = stored.id, "auto-apply: application lookup failed");
                    summary.errors += 1;
                    continue;
                }
            }
            if let Err(error) = self
                .store
                .record_application(CreateApplication {
                    user: user.to_string(),
                    job_id: stored.id,
                    status: "applied".to_string(),
                    match_score: score,
                })
                .await
            {
                warn!(%error, job_id = stored.id, "auto-apply: failed to record application");
                summary.errors += 1;
                continue;
            }
            // Notification delivery is best effort; the application stands
            // either way.
            let title = format!("Applied: {}", stored.job.title);
            let message = format!(
                "Automatically applied to {} at {}.",
                stored.job.title, stored.job.company_name
            );
            if let Err(error) = self.notifier.notify(user, &title, &message).await {
                warn!(%error, "auto-apply: notification failed");
            }
            summary.applied += 1;
        }
        Ok(summary)
    }

    fn search_query(
        &self,
        resume_text: &str,
        options: &MatchOptions,
        default_max: usize,
    ) -> SearchQuery {
        let keywords = options
            .keywords
            .clone()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| {
                let skills = self.extractor.extract_skills(resume_text);
                if skills.is_empty() {
                    DEFAULT_SEARCH_KEYWORDS.to_string()
                } else {
                    skills.join(" ")
                }
            });
        SearchQuery {
            keywords,
            location: options
                .location
                .clone()
                .unwrap_or_else(|| "India".to_string()),
            country: options
                .country
                .clone()
                .unwrap_or_else(|| "India".to_string()),
            max_per_source: options.max_per_source.unwrap_or(default_max),
            role_filter: None,
        }
    }

    async fn store_all(&self, jobs: Vec<Job>) {
        for job in jobs {
            if let Err(error) = self.store.upsert(job).await {
                warn!(%error, "failed to store job");
            }
        }
    }
}
