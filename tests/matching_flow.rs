//! End-to-end flows through the public crate API: boards and catalog
//! companies feeding one aggregation, persistence, ranking, and the
//! auto-apply sweep. Collectors are stubs; nothing here touches the
//! network.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use jobscout::aggregator::{Aggregator, AggregatorConfig, RoleFilter};
use jobscout::catalog::load_catalog;
use jobscout::collectors::{CollectError, CompanyCollector, JobCollector};
use jobscout::matching::{MatchScorer, Similarity};
use jobscout::models::company::CompanyEntry;
use jobscout::models::job::{Job, JobType};
use jobscout::models::query::SearchQuery;
use jobscout::notify::LogNotifier;
use jobscout::pipeline::{MatchOptions, Pipeline};
use jobscout::store::{JobStore, MemoryStore};
use jobscout::text::{SkillExtractor, TextNormalizer};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn job(title: &str, url: &str, description: &str, source: &str) -> Job {
    Job {
        title: title.to_string(),
        company_name: "Acme".to_string(),
        location: "Remote".to_string(),
        job_type: JobType::Remote,
        description: description.to_string(),
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
        Err(CollectError::Parse("layout changed".to_string()))
    }
}

/// One engineer role per catalog entry, with a call counter.
struct CatalogBoard {
    calls: AtomicUsize,
    description: &'static str,
}

impl CatalogBoard {
    fn new(description: &'static str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            description,
        }
    }
}

#[async_trait]
impl CompanyCollector for CatalogBoard {
    fn name(&self) -> &str {
        "catalog-stub"
    }

    async fn collect_company(&self, entry: &CompanyEntry) -> Result<Vec<Job>, CollectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![job(
            "Platform Engineer",
            &format!("{}/opening/1", entry.career_url),
            self.description,
            "company",
        )])
    }
}

fn pipeline(
    boards: Vec<Arc<dyn JobCollector>>,
    companies: Option<Arc<dyn CompanyCollector>>,
    catalog: Vec<CompanyEntry>,
) -> (Pipeline, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let aggregator = Aggregator::new(
        boards,
        companies,
        RoleFilter::default(),
        AggregatorConfig::default(),
    );
    let pipeline = Pipeline::new(
        aggregator,
        catalog,
        Arc::clone(&store) as Arc<dyn JobStore>,
        Arc::new(LogNotifier),
        MatchScorer::new(TextNormalizer::default(), Similarity::Jaccard),
        SkillExtractor::default(),
        RoleFilter::default(),
    );
    (pipeline, store)
}

// Jaccard against the resume "rust tokio axum services": all four resume
// tokens shared, no extras.
const PERFECT_MATCH: &str = "rust tokio axum services";
// Four shared tokens out of an eight token union.
const HALF_MATCH: &str = "rust tokio axum services kernel matrix vector biology";

#[tokio::test]
async fn live_search_combines_boards_and_catalog_companies() {
    let catalog = load_catalog(&[fixture("catalog.json"), fixture("catalog.txt")]);
    assert_eq!(catalog.len(), 4);

    let boards: Vec<Arc<dyn JobCollector>> = vec![
        Arc::new(StaticBoard {
            name: "alpha",
            jobs: vec![
                job("Backend Engineer", "https://dup.test/1", "", "alpha"),
                job("Sales Associate", "https://shop.test/9", "", "alpha"),
            ],
        }),
        Arc::new(StaticBoard {
            name: "beta",
            jobs: vec![
                job("Backend Engineer", "https://dup.test/1", "", "beta"),
                job("DevOps Engineer", "https://beta.test/2", "", "beta"),
            ],
        }),
        Arc::new(FailingBoard),
    ];
    let companies = Arc::new(CatalogBoard::new(""));
    let (pipeline, store) = pipeline(boards, Some(Arc::clone(&companies) as _), catalog);

    let jobs = pipeline
        .live_search(&SearchQuery::with_keywords("backend"), true)
        .await;
    // Two distinct board jobs (the duplicate URL collapses, the sales role
    // is filtered) plus one job per catalog company.
    assert_eq!(jobs.len(), 6);
    assert_eq!(jobs[0].source, "alpha");
    assert!(jobs.iter().all(|j| j.title != "Sales Associate"));
    assert_eq!(companies.calls.load(Ordering::SeqCst), 4);

    // Live search never persists.
    assert!(store.list_active().await.unwrap().is_empty());

    // Excluding ATS sources drops the catalog contribution entirely.
    let boards_only = pipeline
        .live_search(&SearchQuery::with_keywords("backend"), false)
        .await;
    assert_eq!(boards_only.len(), 2);
    assert_eq!(companies.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn match_resume_persists_everything_and_ranks_above_threshold() {
    let boards: Vec<Arc<dyn JobCollector>> = vec![Arc::new(StaticBoard {
        name: "alpha",
        jobs: vec![
            job("Staff Rust Engineer", "https://a.test/1", PERFECT_MATCH, "alpha"),
            job("Backend Engineer", "https://a.test/2", HALF_MATCH, "alpha"),
        ],
    })];
    let (pipeline, store) = pipeline(boards, None, Vec::new());

    let matches = pipeline
        .match_resume("rust tokio axum services", &MatchOptions::default())
        .await
        .unwrap();
    // Default threshold is 60: only the perfect match survives, but both
    // jobs were persisted.
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].job.job.title, "Staff Rust Engineer");
    assert_eq!(matches[0].match_score, 100.0);
    assert_eq!(store.list_active().await.unwrap().len(), 2);

    // A lower threshold exposes both, sorted by score descending; the
    // second aggregation upserts instead of duplicating rows.
    let options = MatchOptions {
        threshold: Some(40.0),
        ..MatchOptions::default()
    };
    let matches = pipeline
        .match_resume("rust tokio axum services", &options)
        .await
        .unwrap();
    let scores: Vec<f64> = matches.iter().map(|m| m.match_score).collect();
    assert_eq!(scores, vec![100.0, 50.0]);
    assert_eq!(store.list_active().await.unwrap().len(), 2);
}

#[tokio::test]
async fn catalog_files_on_disk_drive_company_collection() {
    let catalog = load_catalog(&[fixture("catalog.json"), fixture("catalog.txt")]);
    let companies = Arc::new(CatalogBoard::new(PERFECT_MATCH));
    let (pipeline, store) = pipeline(Vec::new(), Some(Arc::clone(&companies) as _), catalog);

    let matches = pipeline
        .match_resume("rust tokio axum services", &MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(companies.calls.load(Ordering::SeqCst), 4);
    assert_eq!(matches.len(), 4);
    assert_eq!(store.list_active().await.unwrap().len(), 4);

    // Re-matching refreshes the same four rows.
    pipeline
        .match_resume("rust tokio axum services", &MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(companies.calls.load(Ordering::SeqCst), 8);
    assert_eq!(store.list_active().await.unwrap().len(), 4);
}

#[tokio::test]
async fn auto_apply_sweeps_all_sources_and_applies_once() {
    let boards: Vec<Arc<dyn JobCollector>> = vec![Arc::new(StaticBoard {
        name: "alpha",
        jobs: vec![job(
            "Staff Rust Engineer",
            "https://a.test/1",
            PERFECT_MATCH,
            "alpha",
        )],
    })];
    let catalog = vec![
        CompanyEntry::new("Acme", "https://acme.test/careers"),
        CompanyEntry::new("Globex", "https://globex.test/jobs"),
    ];
    // Company roles score 50, below the default threshold.
    let companies = Arc::new(CatalogBoard::new(HALF_MATCH));
    let (pipeline, store) = pipeline(boards, Some(companies as _), catalog);

    let summary = pipeline
        .auto_apply("asha", "rust tokio axum services", &MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(summary.total_found, 3);
    assert_eq!(summary.applied, 1);
    assert_eq!(summary.errors, 0);

    let stored = store.list_active().await.unwrap();
    assert_eq!(stored.len(), 3);
    let applied_to = stored
        .iter()
        .find(|s| s.job.title == "Staff Rust Engineer")
        .unwrap();
    assert!(store.has_applied("asha", applied_to.id).await.unwrap());

    // The same user's second sweep finds nothing new to apply to, while
    // another user starts fresh.
    let again = pipeline
        .auto_apply("asha", "rust tokio axum services", &MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(again.applied, 0);
    assert_eq!(again.errors, 0);

    let other = pipeline
        .auto_apply("ravi", "rust tokio axum services", &MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(other.applied, 1);
}
