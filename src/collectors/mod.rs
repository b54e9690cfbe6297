//! Source collectors.
//!
//! Each external source gets one collector: board collectors answer a search
//! query directly, company collectors take a catalog entry and walk the
//! company's ATS or career page. Collectors normalize whatever the source
//! returns into [`Job`] records and keep their failures to themselves as
//! [`CollectError`]; the aggregator decides what a failure means for the
//! overall request.

pub mod ats;
pub mod indeed;
pub mod linkedin;
pub mod naukri;
pub mod remote_boards;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Selector};

use crate::models::company::CompanyEntry;
use crate::models::job::Job;
use crate::models::query::SearchQuery;
use crate::text::SkillExtractor;

/// Matches the browser profile the sources are known to serve full markup to.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Failure inside a single collector. These never escape the aggregator;
/// they are logged and the collector contributes nothing.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid selector {0}")]
    Selector(String),
    #[error("invalid pattern: {0}")]
    Pattern(String),
    #[error("malformed payload: {0}")]
    Parse(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// HTTP fetch settings shared by all collectors. Injected at construction
/// so tests and deployments can swap the browser profile without touching
/// collector code.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

pub fn build_client(config: &FetchConfig) -> Result<reqwest::Client, CollectError> {
    Ok(reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .build()?)
}

/// A search-driven job source: one call per query.
#[async_trait]
pub trait JobCollector: Send + Sync {
    /// Short source tag, also stamped on every job this collector emits.
    fn name(&self) -> &str;

    async fn collect(&self, query: &SearchQuery) -> Result<Vec<Job>, CollectError>;
}

/// A catalog-driven job source: one call per company entry.
#[async_trait]
pub trait CompanyCollector: Send + Sync {
    fn name(&self) -> &str;

    async fn collect_company(&self, entry: &CompanyEntry) -> Result<Vec<Job>, CollectError>;
}

/// The built-in board roster in fixed invocation order. The order matters
/// to callers only through first-seen-wins deduplication.
pub fn default_boards(
    client: &reqwest::Client,
    extractor: &SkillExtractor,
) -> Vec<Arc<dyn JobCollector>> {
    vec![
        Arc::new(indeed::Indeed::new(client.clone(), extractor.clone())),
        Arc::new(naukri::Naukri::new(client.clone(), extractor.clone())),
        Arc::new(remote_boards::WeWorkRemotely::new(client.clone())),
        Arc::new(remote_boards::RemoteOk::new(client.clone())),
        Arc::new(remote_boards::Remotive::new(client.clone())),
        Arc::new(linkedin::LinkedIn::new(client.clone())),
    ]
}

/// Parse a CSS selector, mapping the unhelpful parse error into one that
/// names the selector.
pub(crate) fn sel(selector: &str) -> Result<Selector, CollectError> {
    Selector::parse(selector).map_err(|e| CollectError::Selector(format!("{selector}: {e:?}")))
}

/// Visible text of an element with runs of whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
