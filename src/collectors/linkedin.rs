use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use scraper::Html;

use crate::collectors::{CollectError, JobCollector, element_text, sel};
use crate::models::job::{Job, JobType};
use crate::models::query::SearchQuery;

/// Characters that encodeURIComponent does NOT encode.
/// RFC 3986 unreserved: A-Z a-z 0-9 - _ . ! ~ * ' ( )
const ENCODE_URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const BASE_URL: &str = "https://www.linkedin.com/jobs/search";

/// LinkedIn public job search. Served markup varies with session state, so
/// this is strictly best effort; the guest search page is the only surface
/// touched and cards without a company or link are dropped.
pub struct LinkedIn {
    client: reqwest::Client,
}

impl LinkedIn {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobCollector for LinkedIn {
    fn name(&self) -> &str {
        "linkedin"
    }

    async fn collect(&self, query: &SearchQuery) -> Result<Vec<Job>, CollectError> {
        let location = if query.location.is_empty() {
            query.country.as_str()
        } else {
            query.location.as_str()
        };
        let url = search_url(&query.keywords, location);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let html = response.text().await?;
        parse_search_page(&html)
    }
}

fn search_url(keywords: &str, location: &str) -> String {
    format!(
        "{BASE_URL}?keywords={}&location={}&trk=jobs_jserp_search_button_execute&pageNum=0",
        urlencoded(keywords),
        urlencoded(location)
    )
}

/// URL-encode a string for use in query parameters.
fn urlencoded(s: &str) -> String {
    utf8_percent_encode(s, ENCODE_URI_COMPONENT_SET).to_string()
}

fn parse_search_page(html: &str) -> Result<Vec<Job>, CollectError> {
    let document = Html::parse_document(html);
    let card_sel = sel("div.job-search-card")?;
    let title_sel = sel("h3.base-search-card__title")?;
    let link_sel = sel("a.base-card__full-link")?;
    let company_sel = sel("h4.base-search-card__subtitle")?;
    let location_sel = sel("span.job-search-card__location")?;

    let mut jobs = Vec::new();
    for card in document.select(&card_sel) {
        let Some(title_el) = card.select(&title_sel).next() else {
            continue;
        };
        let Some(link_el) = card.select(&link_sel).next() else {
            continue;
        };
        let Some(company_el) = card.select(&company_sel).next() else {
            continue;
        };
        let Some(href) = link_el.value().attr("href") else {
            continue;
        };

        let location = card
            .select(&location_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        jobs.push(Job {
            title: element_text(title_el),
            company_name: element_text(company_el),
            location,
            job_type: JobType::FullTime,
            description: String::new(),
            requirements: String::new(),
            salary_min: None,
            salary_max: None,
            application_url: href.to_string(),
            keywords: Vec::new(),
            source: "linkedin".to_string(),
        });
    }
    Ok(jobs)
}
