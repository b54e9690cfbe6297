//! Fan-out search across all configured sources.
//!
//! Every board and every catalog entry becomes one independent task; a
//! failure or timeout in any of them costs only that source's
//! contribution. Results fold back together in invocation order, so
//! first-seen-wins deduplication does not depend on network timing.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::collectors::{CollectError, CompanyCollector, DEFAULT_FETCH_TIMEOUT, JobCollector};
use crate::models::company::CompanyEntry;
use crate::models::job::Job;
use crate::models::query::SearchQuery;

pub const DEFAULT_PER_COMPANY_CAP: usize = 10;
pub const DEFAULT_GLOBAL_TIMEOUT: Duration = Duration::from_secs(45);

/// Case-insensitive substring filter over job titles. Substring matching
/// is a coarse heuristic: "engineer" also matches titles that merely
/// contain the word, e.g. "Engineering Manager". That imprecision is
/// accepted; the filter exists to cut obvious non-software roles, not to
/// classify titles.
#[derive(Debug, Clone)]
pub struct RoleFilter {
    tokens: Vec<String>,
}

impl RoleFilter {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: tokens.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.tokens.iter().any(|token| title.contains(token))
    }
}

impl Default for RoleFilter {
    fn default() -> Self {
        Self::new(
            [
                "software engineer",
                "software developer",
                "developer",
                "engineer",
                "sde",
                "full stack",
                "fullstack",
                "backend",
                "front end",
                "frontend",
                "web developer",
                "android",
                "ios",
                "mobile developer",
                "devops",
                "site reliability",
                "sre",
                "data engineer",
                "ml engineer",
                "ai engineer",
                "cloud engineer",
            ]
            .map(String::from),
        )
    }
}

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Cap on jobs kept per catalog entry.
    pub per_company_cap: usize,
    /// Bound on one source invocation, over and above the HTTP client's
    /// own timeout.
    pub fetch_timeout: Duration,
    /// Wall-clock bound on one whole search; sources still pending when it
    /// elapses are abandoned.
    pub global_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            per_company_cap: DEFAULT_PER_COMPANY_CAP,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            global_timeout: DEFAULT_GLOBAL_TIMEOUT,
        }
    }
}

pub struct Aggregator {
    boards: Vec<Arc<dyn JobCollector>>,
    company_collector: Option<Arc<dyn CompanyCollector>>,
    role_filter: RoleFilter,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(
        boards: Vec<Arc<dyn JobCollector>>,
        company_collector: Option<Arc<dyn CompanyCollector>>,
        role_filter: RoleFilter,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            boards,
            company_collector,
            role_filter,
            config,
        }
    }

    /// Runs every board plus one task per catalog entry, waits for all of
    /// them (bounded by the global timeout), then folds whatever arrived
    /// into one validated, role-filtered, URL-deduplicated list.
    pub async fn search(&self, query: &SearchQuery, catalog: &[CompanyEntry]) -> Vec<Job> {
        let mut tasks: JoinSet<(usize, Result<Vec<Job>, CollectError>)> = JoinSet::new();
        let mut sources: Vec<String> = Vec::new();

        let fetch_timeout = self.config.fetch_timeout;
        for board in &self.boards {
            let slot = sources.len();
            sources.push(board.name().to_string());
            let board = Arc::clone(board);
            let query = query.clone();
            let cap = query.max_per_source;
            tasks.spawn(async move {
                let result = match tokio::time::timeout(fetch_timeout, board.collect(&query)).await
                {
                    Ok(result) => result.map(|mut jobs| {
                        jobs.truncate(cap);
                        jobs
                    }),
                    Err(_) => Err(CollectError::Timeout(fetch_timeout)),
                };
                (slot, result)
            });
        }

        if let Some(collector) = &self.company_collector {
            for entry in catalog {
                let slot = sources.len();
                sources.push(entry.career_url.clone());
                let collector = Arc::clone(collector);
                let entry = entry.clone();
                let cap = self.config.per_company_cap;
                tasks.spawn(async move {
                    let result =
                        match tokio::time::timeout(fetch_timeout, collector.collect_company(&entry))
                            .await
                        {
                            Ok(result) => result.map(|mut jobs| {
                                jobs.truncate(cap);
                                jobs
                            }),
                            Err(_) => Err(CollectError::Timeout(fetch_timeout)),
                        };
                    (slot, result)
                });
            }
        }

        let mut slots: Vec<Option<Vec<Job>>> = (0..sources.len()).map(|_| None).collect();
        let completed = tokio::time::timeout(self.config.global_timeout, async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((slot, Ok(jobs))) => {
                        debug!(source = %sources[slot], count = jobs.len(), "source finished");
                        slots[slot] = Some(jobs);
                    }
                    Ok((slot, Err(error))) => {
                        warn!(source = %sources[slot], %error, "source contributed nothing");
                    }
                    Err(error) => warn!(%error, "collector task failed"),
                }
            }
        })
        .await;
        if completed.is_err() {
            warn!(
                timeout = ?self.config.global_timeout,
                "search timed out, abandoning pending sources"
            );
            tasks.abort_all();
        }

        let filter = match &query.role_filter {
            Some(tokens) => RoleFilter::new(tokens.clone()),
            None => self.role_filter.clone(),
        };
        let mut seen = HashSet::new();
        let mut jobs = Vec::new();
        for collected in slots.into_iter().flatten() {
            for job in collected {
                if !job.has_required_fields() {
                    continue;
                }
                if !filter.matches(&job.title) {
                    continue;
                }
                if seen.insert(job.application_url.clone()) {
                    jobs.push(job);
                }
            }
        }
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::job::JobType;

    fn job(title: &str, url: &str, source: &str) -> Job {
        Job {
            title: title.to_string(),
            company_name: "Acme".to_string(),
            location: String::new(),
            job_type: JobType::default(),
            description: String::new(),
            requirements: String::new(),
            salary_min: None,
            salary_max: None,
            application_url: url.to_string(),
            keywords: Vec::new(),
            source: source.to_string(),
        }
    }

    struct StaticBoard {
        name: &'static str,
        jobs: Vec<Job>,
    }

    #[async_trait]
    impl JobCollector for StaticBoard {
        fn name(&self) -> &str {
            self.name
        }

        async fn collect(&self, _query: &SearchQuery) -> Result<Vec<Job>, CollectError> {
            Ok(self.jobs.clone())
        }
    }

    struct FailingBoard;

    #[async_trait]
    impl JobCollector for FailingBoard {
        fn name(&self) -> &str {
            "failing"
        }

        async fn collect(&self, _query: &SearchQuery) -> Result<Vec<Job>, CollectError> {
            Err(CollectError::Parse("structure changed".to_string()))
        }
    }

    struct SlowBoard;

    #[async_trait]
    impl JobCollector for SlowBoard {
        fn name(&self) -> &str {
            "slow"
        }

        async fn collect(&self, _query: &SearchQuery) -> Result<Vec<Job>, CollectError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![job("Late Engineer", "https://slow.test/1", "slow")])
        }
    }

    struct CountingCompanies {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompanyCollector for CountingCompanies {
        fn name(&self) -> &str {
            "counting"
        }

        async fn collect_company(&self, entry: &CompanyEntry) -> Result<Vec<Job>, CollectError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![job(
                "Company Engineer",
                &format!("{}/1", entry.career_url),
                "company",
            )])
        }
    }

    fn aggregator(boards: Vec<Arc<dyn JobCollector>>) -> Aggregator {
        Aggregator::new(
            boards,
            None,
            RoleFilter::default(),
            AggregatorConfig::default(),
        )
    }

    #[test]
    fn role_tokens_match_as_substrings_case_insensitively() {
        let filter = RoleFilter::default();
        assert!(filter.matches("Senior Software Engineer"));
        assert!(filter.matches("DEVOPS specialist"));
        // Substring semantics: "engineer" is inside "Engineering".
        assert!(filter.matches("Engineering Manager"));
        assert!(!filter.matches("Accountant"));
    }

    #[tokio::test]
    async fn failing_source_does_not_poison_the_rest() {
        let agg = aggregator(vec![
            Arc::new(FailingBoard),
            Arc::new(StaticBoard {
                name: "ok",
                jobs: vec![job("Backend Engineer", "https://ok.test/1", "ok")],
            }),
        ]);
        let jobs = agg.search(&SearchQuery::default(), &[]).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Backend Engineer");
    }

    #[tokio::test]
    async fn duplicate_urls_keep_the_first_seen_record() {
        let agg = aggregator(vec![
            Arc::new(StaticBoard {
                name: "first",
                jobs: vec![job("Backend Engineer", "https://dup.test/1", "first")],
            }),
            Arc::new(StaticBoard {
                name: "second",
                jobs: vec![
                    job("Backend Engineer", "https://dup.test/1", "second"),
                    job("Frontend Engineer", "https://dup.test/2", "second"),
                ],
            }),
        ]);
        let jobs = agg.search(&SearchQuery::default(), &[]).await;
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].source, "first");
        assert_eq!(jobs[1].source, "second");
    }

    #[tokio::test]
    async fn titles_outside_the_role_filter_are_dropped() {
        let agg = aggregator(vec![Arc::new(StaticBoard {
            name: "mixed",
            jobs: vec![
                job("Software Engineer", "https://m.test/1", "mixed"),
                job("Sales Associate", "https://m.test/2", "mixed"),
            ],
        })]);
        let jobs = agg.search(&SearchQuery::default(), &[]).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Software Engineer");
    }

    #[tokio::test]
    async fn query_role_filter_overrides_the_default() {
        let agg = aggregator(vec![Arc::new(StaticBoard {
            name: "mixed",
            jobs: vec![
                job("Software Engineer", "https://m.test/1", "mixed"),
                job("Product Designer", "https://m.test/2", "mixed"),
            ],
        })]);
        let query = SearchQuery {
            role_filter: Some(vec!["designer".to_string()]),
            ..SearchQuery::default()
        };
        let jobs = agg.search(&query, &[]).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Product Designer");
    }

    #[tokio::test]
    async fn records_missing_required_fields_are_discarded() {
        let agg = aggregator(vec![Arc::new(StaticBoard {
            name: "sloppy",
            jobs: vec![
                job("", "https://s.test/1", "sloppy"),
                job("Backend Engineer", "", "sloppy"),
                job("Backend Engineer", "https://s.test/2", "sloppy"),
            ],
        })]);
        let jobs = agg.search(&SearchQuery::default(), &[]).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].application_url, "https://s.test/2");
    }

    #[tokio::test]
    async fn board_results_are_capped_per_source() {
        let many: Vec<Job> = (0..30)
            .map(|i| job("Backend Engineer", &format!("https://b.test/{i}"), "big"))
            .collect();
        let agg = aggregator(vec![Arc::new(StaticBoard {
            name: "big",
            jobs: many,
        })]);
        let query = SearchQuery {
            max_per_source: 10,
            ..SearchQuery::default()
        };
        let jobs = agg.search(&query, &[]).await;
        assert_eq!(jobs.len(), 10);
    }

    #[tokio::test]
    async fn catalog_entries_each_get_one_invocation() {
        let companies = Arc::new(CountingCompanies {
            calls: AtomicUsize::new(0),
        });
        let agg = Aggregator::new(
            Vec::new(),
            Some(Arc::clone(&companies) as Arc<dyn CompanyCollector>),
            RoleFilter::default(),
            AggregatorConfig::default(),
        );
        let catalog = vec![
            CompanyEntry::new("Acme", "https://acme.test/careers"),
            CompanyEntry::new("Globex", "https://globex.test/careers"),
        ];
        let jobs = agg.search(&SearchQuery::default(), &catalog).await;
        assert_eq!(companies.calls.load(Ordering::SeqCst), 2);
        assert_eq!(jobs.len(), 2);
    }

    #[tokio::test]
    async fn slow_source_times_out_without_blocking_others() {
        let agg = Aggregator::new(
            vec![
                Arc::new(SlowBoard),
                Arc::new(StaticBoard {
                    name: "fast",
                    jobs: vec![job("Backend Engineer", "https://fast.test/1", "fast")],
                }),
            ],
            None,
            RoleFilter::default(),
            AggregatorConfig {
                fetch_timeout: Duration::from_millis(50),
                ..AggregatorConfig::default()
            },
        );
        let started = std::time::Instant::now();
        let jobs = agg.search(&SearchQuery::default(), &[]).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source, "fast");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn global_timeout_abandons_pending_sources() {
        let agg = Aggregator::new(
            vec![
                Arc::new(SlowBoard),
                Arc::new(StaticBoard {
                    name: "fast",
                    jobs: vec![job("Backend Engineer", "https://fast.test/1", "fast")],
                }),
            ],
            None,
            RoleFilter::default(),
            AggregatorConfig {
                global_timeout: Duration::from_millis(100),
                ..AggregatorConfig::default()
            },
        );
        let jobs = agg.search(&SearchQuery::default(), &[]).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source, "fast");
    }
}
