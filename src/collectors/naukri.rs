use async_trait::async_trait;
use scraper::{ElementRef, Html};

use crate::collectors::{CollectError, JobCollector, element_text, sel};
use crate::models::job::{Job, JobType};
use crate::models::query::SearchQuery;
use crate::text::SkillExtractor;

/// Naukri search results. The site ships several card layouts depending on
/// the page variant served, so selection is deliberately loose: generic
/// card selectors first, class-fragment fallbacks second.
pub struct Naukri {
    client: reqwest::Client,
    extractor: SkillExtractor,
}

impl Naukri {
    pub fn new(client: reqwest::Client, extractor: SkillExtractor) -> Self {
        Self { client, extractor }
    }
}

#[async_trait]
impl JobCollector for Naukri {
    fn name(&self) -> &str {
        "naukri"
    }

    async fn collect(&self, query: &SearchQuery) -> Result<Vec<Job>, CollectError> {
        let location = if query.location.is_empty() {
            "india"
        } else {
            query.location.as_str()
        };
        let url = search_url(&query.keywords, location);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CollectError::Status(response.status()));
        }
        let html = response.text().await?;
        parse_search_page(&html, &self.extractor)
    }
}

/// Naukri encodes the search in the path, dash-separated.
fn search_url(keywords: &str, location: &str) -> String {
    let kw = keywords.trim().replace(' ', "-");
    let loc = location.trim().replace(' ', "-");
    if !kw.is_empty() && !loc.is_empty() {
        format!("https://www.naukri.com/{kw}-jobs-in-{loc}")
    } else if !kw.is_empty() {
        format!("https://www.naukri.com/{kw}-jobs")
    } else {
        "https://www.naukri.com/jobs".to_string()
    }
}

fn parse_search_page(html: &str, extractor: &SkillExtractor) -> Result<Vec<Job>, CollectError> {
    let document = Html::parse_document(html);
    let primary_sel = sel("article.jobTuple, div.list > div.cardWrapper")?;
    let fallback_sel = sel(r#"div[class*="jdwhtw"], div[class*="cust-job-tuple"]"#)?;
    let titled_sel = sel("a[title], span[title]")?;
    let anchor_sel = sel("a[href]")?;
    let company_sel = sel(r#"a[class*="comp"]"#)?;
    let span_sel = sel("span")?;
    let location_sel = sel(r#"li[class*="location"], span[class*="loc"]"#)?;

    let mut cards: Vec<ElementRef<'_>> = document.select(&primary_sel).collect();
    if cards.is_empty() {
        cards = document.select(&fallback_sel).collect();
    }

    let mut jobs = Vec::new();
    for card in cards {
        let title_el = card
            .select(&titled_sel)
            .next()
            .or_else(|| card.select(&anchor_sel).next());
        let Some(title_el) = title_el else {
            continue;
        };

        let company_el = card.select(&company_sel).next().or_else(|| {
            // Some layouts only name the company in a plain span.
            card.select(&span_sel)
                .find(|s| looks_like_company(&element_text(*s)))
        });
        let Some(company_el) = company_el else {
            continue;
        };

        let link = title_el
            .value()
            .attr("href")
            .or_else(|| {
                card.select(&anchor_sel)
                    .next()
                    .and_then(|a| a.value().attr("href"))
            })
            .map(str::to_string);
        let Some(application_url) = link else {
            continue;
        };

        let title = element_text(title_el);
        let location = card
            .select(&location_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let keywords = extractor.extract_skills(&title);
        jobs.push(Job {
            title,
            company_name: element_text(company_el),
            location,
            job_type: JobType::FullTime,
            description: String::new(),
            requirements: String::new(),
            salary_min: None,
            salary_max: None,
            application_url,
            keywords,
            source: "naukri".to_string(),
        });
    }
    Ok(jobs)
}

fn looks_like_company(text: &str) -> bool {
    let lowered = text.to_lowercase();
    ["ltd", "inc", "pvt", "company"]
        .iter()
        .any(|marker| lowered.contains(marker))
}
