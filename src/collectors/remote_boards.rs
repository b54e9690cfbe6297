//! Remote-only job boards. All three publish a single public listing page,
//! carry no location data beyond "Remote", and link postings with
//! site-relative hrefs that need the origin prefixed back on.

use async_trait::async_trait;
use scraper::Html;

use crate::collectors::{CollectError, JobCollector, element_text, sel};
use crate::models::job::{Job, JobType};
use crate::models::query::SearchQuery;

fn remote_job(title: String, company_name: String, application_url: String, source: &str) -> Job {
    Job {
        title,
        company_name,
        location: "Remote".to_string(),
        job_type: JobType::Remote,
        description: String::new(),
        requirements: String::new(),
        salary_min: None,
        salary_max: None,
        application_url,
        keywords: Vec::new(),
        source: source.to_string(),
    }
}

fn absolutize(origin: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{origin}{href}")
    }
}

pub struct WeWorkRemotely {
    client: reqwest::Client,
}

impl WeWorkRemotely {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobCollector for WeWorkRemotely {
    fn name(&self) -> &str {
        "weworkremotely"
    }

    async fn collect(&self, _query: &SearchQuery) -> Result<Vec<Job>, CollectError> {
        let response = self
            .client
            .get("https://weworkremotely.com/categories/remote-programming-jobs")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let html = response.text().await?;
        parse_weworkremotely(&html)
    }
}

fn parse_weworkremotely(html: &str) -> Result<Vec<Job>, CollectError> {
    let document = Html::parse_document(html);
    let item_sel = sel("section.jobs li.feature, section.jobs li:not(.view-all)")?;
    let anchor_sel = sel("a[href]")?;
    let title_sel = sel("span.title")?;
    let company_sel = sel("span.company")?;

    let mut jobs = Vec::new();
    for item in document.select(&item_sel) {
        let Some(anchor) = item.select(&anchor_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let title = anchor
            .select(&title_sel)
            .next()
            .map(element_text)
            .unwrap_or_else(|| element_text(anchor));
        let company = anchor
            .select(&company_sel)
            .next()
            .map(element_text)
            .unwrap_or_else(|| "Unknown".to_string());
        jobs.push(remote_job(
            title,
            company,
            absolutize("https://weworkremotely.com", href),
            "weworkremotely",
        ));
    }
    Ok(jobs)
}

pub struct RemoteOk {
    client: reqwest::Client,
}

impl RemoteOk {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobCollector for RemoteOk {
    fn name(&self) -> &str {
        "remoteok"
    }

    async fn collect(&self, _query: &SearchQuery) -> Result<Vec<Job>, CollectError> {
        let response = self
            .client
            .get("https://remoteok.com/remote-dev-jobs")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let html = response.text().await?;
        parse_remoteok(&html)
    }
}

fn parse_remoteok(html: &str) -> Result<Vec<Job>, CollectError> {
    let document = Html::parse_document(html);
    let row_sel = sel("table#jobsboard tr.job")?;
    let heading_sel = sel("h2")?;
    let position_sel = sel("td.company_and_position")?;
    let subheading_sel = sel("h3")?;
    let company_cell_sel = sel("td.company")?;
    let anchor_sel = sel("a[href]")?;

    let mut jobs = Vec::new();
    for row in document.select(&row_sel) {
        let title_el = row
            .select(&heading_sel)
            .next()
            .or_else(|| row.select(&position_sel).next());
        let Some(title_el) = title_el else {
            continue;
        };
        let company = row
            .select(&subheading_sel)
            .next()
            .or_else(|| row.select(&company_cell_sel).next())
            .map(element_text)
            .unwrap_or_else(|| "Unknown".to_string());
        // Rows carry the posting link as a data attribute.
        let href = row
            .value()
            .attr("data-href")
            .map(str::to_string)
            .or_else(|| {
                row.select(&anchor_sel)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .map(str::to_string)
            });
        let Some(href) = href else {
            continue;
        };
        jobs.push(remote_job(
            element_text(title_el),
            company,
            absolutize("https://remoteok.com", &href),
            "remoteok",
        ));
    }
    Ok(jobs)
}

pub struct Remotive {
    client: reqwest::Client,
}

impl Remotive {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobCollector for Remotive {
    fn name(&self) -> &str {
        "remotive"
    }

    async fn collect(&self, _query: &SearchQuery) -> Result<Vec<Job>, CollectError> {
        let response = self
            .client
            .get("https://remotive.com/remote-jobs/software-dev")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let html = response.text().await?;
        parse_remotive(&html)
    }
}

fn parse_remotive(html: &str) -> Result<Vec<Job>, CollectError> {
    let document = Html::parse_document(html);
    let tile_sel = sel("div.job-tile")?;
    let anchor_sel = sel("a[href]")?;
    let title_sel = sel("span.font-weight-bold")?;
    let company_sel = sel("span.company")?;

    let mut jobs = Vec::new();
    for tile in document.select(&tile_sel) {
        let Some(anchor) = tile.select(&anchor_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let title = tile
            .select(&title_sel)
            .next()
            .map(element_text)
            .unwrap_or_else(|| element_text(anchor));
        let company = tile
            .select(&company_sel)
            .next()
            .map(element_text)
            .unwrap_or_else(|| "Unknown".to_string());
        let url = if href.starts_with('/') {
            format!("https://remotive.com{href}")
        } else {
            href.to_string()
        };
        jobs.push(remote_job(title, company, url, "remotive"));
    }
    Ok(jobs)
}
