//! Catalog-driven collection from applicant-tracking systems.
//!
//! Known ATS platforms expose public JSON listing APIs keyed by a tenant
//! token. The token is read from the career URL's path when it is there,
//! otherwise discovered by fetching the career page and matching the API
//! endpoint pattern embedded in its markup. When the token cannot be found
//! the company contributes nothing; guessing tenants is worse than an
//! empty result. URLs on none of the known platforms fall back to a
//! heuristic scan of the career page for posting-shaped links.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use scraper::Html;
use serde_json::Value;
use tracing::debug;

use crate::collectors::{CollectError, CompanyCollector, element_text, sel};
use crate::models::company::CompanyEntry;
use crate::models::job::{Job, JobType};

/// Maximum anchors harvested from an unrecognized career page.
const CAREER_PAGE_LINK_CAP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtsPlatform {
    Greenhouse,
    Lever,
    SmartRecruiters,
}

impl AtsPlatform {
    /// Detects a platform from an already-lowercased career URL.
    pub fn detect(url: &str) -> Option<Self> {
        if url.contains("greenhouse.io") {
            Some(Self::Greenhouse)
        } else if url.contains("lever.co") {
            Some(Self::Lever)
        } else if url.contains("smartrecruiters.com") {
            Some(Self::SmartRecruiters)
        } else {
            None
        }
    }
}

pub struct AtsCollector {
    client: reqwest::Client,
    greenhouse_board: Regex,
    greenhouse_api: Regex,
    lever_host: Regex,
    lever_api: Regex,
    smartrecruiters_path: Regex,
}

impl AtsCollector {
    pub fn new(client: reqwest::Client) -> Result<Self, CollectError> {
        let pattern = |p: &str| Regex::new(p).map_err(|e| CollectError::Pattern(e.to_string()));
        Ok(Self {
            client,
            greenhouse_board: pattern(r"boards\.greenhouse\.io/([\w-]+)")?,
            greenhouse_api: pattern(r"boards-api\.greenhouse\.io/v1/boards/([\w-]+)/")?,
            lever_host: pattern(r"lever\.co/([\w-]+)")?,
            lever_api: pattern(r"api\.lever\.co/v0/postings/([\w-]+)")?,
            smartrecruiters_path: pattern(r"smartrecruiters\.com/([\w-]+)/?")?,
        })
    }

    async fn collect_greenhouse(&self, career_url: &str) -> Result<Vec<Job>, CollectError> {
        let tenant = match capture(&self.greenhouse_board, career_url) {
            Some(tenant) => Some(tenant),
            None => self.discover_tenant(career_url, &self.greenhouse_api).await?,
        };
        let Some(tenant) = tenant else {
            debug!(url = career_url, "no greenhouse board token found");
            return Ok(Vec::new());
        };
        let api = format!("https://boards-api.greenhouse.io/v1/boards/{tenant}/jobs?content=true");
        let response = self.client.get(&api).send().await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let data: Value = response.json().await?;
        Ok(map_greenhouse(&data, &tenant))
    }

    async fn collect_lever(&self, career_url: &str) -> Result<Vec<Job>, CollectError> {
        let tenant = match capture(&self.lever_host, career_url) {
            Some(tenant) => Some(tenant),
            None => self.discover_tenant(career_url, &self.lever_api).await?,
        };
        let Some(tenant) = tenant else {
            debug!(url = career_url, "no lever tenant found");
            return Ok(Vec::new());
        };
        let api = format!("https://api.lever.co/v0/postings/{tenant}?mode=json");
        let response = self.client.get(&api).send().await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let data: Value = response.json().await?;
        Ok(map_lever(&data, &tenant))
    }

    async fn collect_smartrecruiters(&self, career_url: &str) -> Result<Vec<Job>, CollectError> {
        let Some(tenant) = capture(&self.smartrecruiters_path, career_url) else {
            debug!(url = career_url, "no smartrecruiters tenant found");
            return Ok(Vec::new());
        };
        let api = format!("https://api.smartrecruiters.com/v1/companies/{tenant}/postings");
        let response = self.client.get(&api).send().await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let data: Value = response.json().await?;
        Ok(map_smartrecruiters(&data, &tenant))
    }

    /// Fetches the career page and pulls the tenant token out of the API
    /// endpoint the page embeds.
    async fn discover_tenant(
        &self,
        career_url: &str,
        api_pattern: &Regex,
    ) -> Result<Option<String>, CollectError> {
        let response = self.client.get(career_url).send().await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let html = response.text().await?;
        Ok(capture(api_pattern, &html))
    }

    async fn collect_career_page(&self, career_url: &str) -> Result<Vec<Job>, CollectError> {
        let response = self.client.get(career_url).send().await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let html = response.text().await?;
        parse_career_page(&html, career_url)
    }
}

#[async_trait]
impl CompanyCollector for AtsCollector {
    fn name(&self) -> &str {
        "ats"
    }

    async fn collect_company(&self, entry: &CompanyEntry) -> Result<Vec<Job>, CollectError> {
        let lowered = entry.career_url.to_lowercase();
        match AtsPlatform::detect(&lowered) {
            Some(AtsPlatform::Greenhouse) => self.collect_greenhouse(&entry.career_url).await,
            Some(AtsPlatform::Lever) => self.collect_lever(&entry.career_url).await,
            Some(AtsPlatform::SmartRecruiters) => {
                self.collect_smartrecruiters(&entry.career_url).await
            }
            None => self.collect_career_page(&entry.career_url).await,
        }
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// "acme-corp" -> "Acme Corp". Tenant tokens double as the display name
/// when an ATS payload carries none.
fn display_name(tenant: &str) -> String {
    title_case(&tenant.replace('-', " "))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn ats_job(
    title: &str,
    company_name: String,
    location: &str,
    description: &str,
    application_url: &str,
    source: &str,
) -> Job {
    Job {
        title: title.to_string(),
        company_name,
        location: location.to_string(),
        job_type: JobType::FullTime,
        description: description.to_string(),
        requirements: String::new(),
        salary_min: None,
        salary_max: None,
        application_url: application_url.to_string(),
        keywords: Vec::new(),
        source: source.to_string(),
    }
}

fn map_greenhouse(data: &Value, tenant: &str) -> Vec<Job> {
    let company_name = display_name(tenant);
    data.get("jobs")
        .and_then(|v| v.as_array())
        .map(|jobs| {
            jobs.iter()
                .map(|j| {
                    ats_job(
                        j.get("title").and_then(|v| v.as_str()).unwrap_or_default(),
                        company_name.clone(),
                        j.get("location")
                            .and_then(|l| l.get("name"))
                            .and_then(|v| v.as_str())
                            .unwrap_or_default(),
                        j.get("content").and_then(|v| v.as_str()).unwrap_or_default(),
                        j.get("absolute_url")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default(),
                        "greenhouse",
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn map_lever(data: &Value, tenant: &str) -> Vec<Job> {
    let company_name = display_name(tenant);
    data.as_array()
        .map(|postings| {
            postings
                .iter()
                .map(|j| {
                    ats_job(
                        j.get("text").and_then(|v| v.as_str()).unwrap_or_default(),
                        company_name.clone(),
                        j.get("categories")
                            .and_then(|c| c.get("location"))
                            .and_then(|v| v.as_str())
                            .unwrap_or_default(),
                        j.get("lists")
                            .and_then(|v| v.as_array())
                            .and_then(|lists| lists.first())
                            .and_then(|l| l.get("content"))
                            .and_then(|v| v.as_str())
                            .unwrap_or_default(),
                        j.get("hostedUrl")
                            .or_else(|| j.get("applyUrl"))
                            .and_then(|v| v.as_str())
                            .unwrap_or_default(),
                        "lever",
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn map_smartrecruiters(data: &Value, tenant: &str) -> Vec<Job> {
    let company_name = display_name(tenant);
    data.get("content")
        .and_then(|v| v.as_array())
        .map(|postings| {
            postings
                .iter()
                .map(|j| {
                    ats_job(
                        j.get("name").and_then(|v| v.as_str()).unwrap_or_default(),
                        company_name.clone(),
                        j.get("location")
                            .and_then(|l| l.get("city"))
                            .and_then(|v| v.as_str())
                            .unwrap_or_default(),
                        j.get("jobAd")
                            .and_then(|a| a.get("sections"))
                            .and_then(|s| s.get("jobDescription"))
                            .and_then(|d| d.get("text"))
                            .and_then(|v| v.as_str())
                            .unwrap_or_default(),
                        j.get("ref")
                            .and_then(|r| r.get("jobAd"))
                            .and_then(|v| v.as_str())
                            .unwrap_or_default(),
                        "smartrecruiters",
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Harvests posting-shaped anchors from a career page with no recognized
/// ATS. Minimal records only: anchor text, resolved URL, host-derived
/// company name.
fn parse_career_page(html: &str, career_url: &str) -> Result<Vec<Job>, CollectError> {
    let base = Url::parse(career_url)
        .map_err(|e| CollectError::Parse(format!("career url {career_url}: {e}")))?;
    let origin = base.origin().ascii_serialization();
    let company_name = base
        .host_str()
        .and_then(|host| host.split('.').next())
        .map(title_case)
        .unwrap_or_default();

    let document = Html::parse_document(html);
    let link_sel = sel(
        r#"a[href*="job"], a[href*="careers"], a[href*="opening"], a[href*="opportunity"]"#,
    )?;

    let mut jobs = Vec::new();
    for anchor in document.select(&link_sel).take(CAREER_PAGE_LINK_CAP) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let application_url = if href.starts_with("http") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{origin}{href}")
        } else {
            format!("{origin}/{href}")
        };
        let text = element_text(anchor);
        let title = if text.is_empty() { "Job".to_string() } else { text };
        jobs.push(ats_job(
            &title,
            company_name.clone(),
            "",
            "",
            &application_url,
            "company",
        ));
    }
    Ok(jobs)
}
