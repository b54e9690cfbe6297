use async_trait::async_trait;
use scraper::Html;

use crate::collectors::{CollectError, JobCollector, element_text, sel};
use crate::models::job::{Job, JobType};
use crate::models::query::SearchQuery;
use crate::text::SkillExtractor;

const BASE_URL: &str = "https://www.indeed.com/jobs";
const INDIA_BASE_URL: &str = "https://in.indeed.com/jobs";

/// Indeed search results. Cards carry title, company, and location only;
/// descriptions would need a per-job detail fetch, so they stay empty here.
pub struct Indeed {
    client: reqwest::Client,
    extractor: SkillExtractor,
}

impl Indeed {
    pub fn new(client: reqwest::Client, extractor: SkillExtractor) -> Self {
        Self { client, extractor }
    }
}

#[async_trait]
impl JobCollector for Indeed {
    fn name(&self) -> &str {
        "indeed"
    }

    async fn collect(&self, query: &SearchQuery) -> Result<Vec<Job>, CollectError> {
        let india = query.targets_india();
        let base = if india { INDIA_BASE_URL } else { BASE_URL };
        let location = if query.location.is_empty() && india {
            "India"
        } else {
            query.location.as_str()
        };

        let response = self
            .client
            .get(base)
            .query(&[
                ("q", query.keywords.as_str()),
                ("l", location),
                ("sort", "date"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let html = response.text().await?;
        parse_search_page(&html, &self.extractor)
    }
}

fn parse_search_page(html: &str, extractor: &SkillExtractor) -> Result<Vec<Job>, CollectError> {
    let document = Html::parse_document(html);
    let card_sel = sel("div.job_seen_beacon")?;
    let title_sel = sel("h2.jobTitle")?;
    let link_sel = sel("a.jcs-JobTitle")?;
    let company_sel = sel("span.companyName")?;
    let location_sel = sel("div.companyLocation")?;

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
        let Some(location_el) = card.select(&location_sel).next() else {
            continue;
        };

        // The stable job id beats the session-scoped href when present.
        let application_url = match link_el.value().attr("data-jk") {
            Some(id) if !id.is_empty() => format!("https://www.indeed.com/viewjob?jk={id}"),
            _ => match link_el.value().attr("href") {
                Some(href) => href.to_string(),
                None => continue,
            },
        };

        let title = element_text(title_el);
        let company_name = element_text(company_el);
        let keywords = extractor.extract_skills(&format!("{title} {company_name}"));
        jobs.push(Job {
            title,
            company_name,
            location: element_text(location_el),
            job_type: JobType::FullTime,
            description: String::new(),
            requirements: String::new(),
            salary_min: None,
            salary_max: None,
            application_url,
            keywords,
            source: "indeed".to_string(),
        });
    }
    Ok(jobs)
}
