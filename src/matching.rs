//! Resume-to-job similarity scoring and ranking.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::job::{Job, StoredJob};
use crate::text::TextNormalizer;

/// Jobs scoring below this are excluded from match output unless the
/// caller overrides the threshold.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 60.0;

/// Similarity strategy, fixed at construction. The vector method is the
/// default; Jaccard is the dependency-free baseline and is always
/// available. Both are pure functions of their inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Similarity {
    #[default]
    #[value(name = "tfidf")]
    TfIdfCosine,
    #[value(name = "jaccard")]
    Jaccard,
}

/// The two text fields similarity is computed over. Ranking works the same
/// whether the job is a transient aggregation result or a stored row.
pub trait MatchText {
    fn description(&self) -> &str;
    fn requirements(&self) -> &str;
}

impl MatchText for Job {
    fn description(&self) -> &str {
        &self.description
    }

    fn requirements(&self) -> &str {
        &self.requirements
    }
}

impl MatchText for StoredJob {
    fn description(&self) -> &str {
        &self.job.description
    }

    fn requirements(&self) -> &str {
        &self.job.requirements
    }
}

/// One scored job, as returned to callers of the match operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult<T = Job> {
    pub job: T,
    pub match_score: f64,
}

/// Scores a resume against job text. Normalization runs on every input on
/// every call; there is no cached or shared mutable state, so identical
/// inputs always produce bit-identical scores.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    normalizer: TextNormalizer,
    method: Similarity,
}

impl MatchScorer {
    pub fn new(normalizer: TextNormalizer, method: Similarity) -> Self {
        Self { normalizer, method }
    }

    pub fn method(&self) -> Similarity {
        self.method
    }

    /// Similarity in [0, 100] between the resume and the job's combined
    /// description + requirements text. Either side normalizing to empty
    /// scores 0.0, not an error.
    pub fn score(&self, resume_text: &str, job_description: &str, job_requirements: &str) -> f64 {
        let resume = self.normalizer.normalize(resume_text);
        let mut job = self.normalizer.normalize(job_description);
        let requirements = self.normalizer.normalize(job_requirements);
        if !requirements.is_empty() {
            if !job.is_empty() {
                job.push(' ');
            }
            job.push_str(&requirements);
        }
        if resume.is_empty() || job.is_empty() {
            return 0.0;
        }
        match self.method {
            Similarity::TfIdfCosine => tfidf_cosine(&resume, &job) * 100.0,
            Similarity::Jaccard => jaccard(&resume, &job) * 100.0,
        }
    }

    /// Scores every job, drops those below `threshold` (compared against
    /// the raw score), and returns the rest sorted by score descending.
    /// The reported score is rounded to two decimals; the sort is stable,
    /// so equal scores keep their input order.
    pub fn rank<T: MatchText>(
        &self,
        resume_text: &str,
        jobs: Vec<T>,
        threshold: f64,
    ) -> Vec<MatchResult<T>> {
        let mut matches: Vec<MatchResult<T>> = jobs
            .into_iter()
            .filter_map(|job| {
                let raw = self.score(resume_text, job.description(), job.requirements());
                (raw >= threshold).then(|| MatchResult {
                    job,
                    match_score: round2(raw),
                })
            })
            .collect();
        matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        matches
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn term_counts(doc: &str) -> BTreeMap<&str, f64> {
    let mut counts = BTreeMap::new();
    for token in doc.split_whitespace() {
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of the two documents' tf-idf vectors over the
/// two-document corpus. Term frequency is the raw in-document count; idf
/// uses the smoothed form ln((1+N)/(1+df)) + 1 so terms present in both
/// documents still carry weight. BTreeMap keeps summation order fixed,
/// which keeps repeated calls bit-identical.
fn tfidf_cosine(a: &str, b: &str) -> f64 {
    let tf_a = term_counts(a);
    let tf_b = term_counts(b);

    let idf = |in_other: bool| -> f64 {
        let df: f64 = if in_other { 2.0 } else { 1.0 };
        ((1.0 + 2.0) / (1.0 + df)).ln() + 1.0
    };

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    for (term, count_a) in &tf_a {
        let shared = tf_b.contains_key(term);
        let weight_a = count_a * idf(shared);
        norm_a += weight_a * weight_a;
        if let Some(count_b) = tf_b.get(term) {
            dot += weight_a * (count_b * idf(true));
        }
    }
    let mut norm_b = 0.0;
    for (term, count_b) in &tf_b {
        let weight_b = count_b * idf(tf_a.contains_key(term));
        norm_b += weight_b * weight_b;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Token-set intersection over union. Either set empty scores zero.
fn jaccard(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count() as f64;
    let union = set_a.union(&set_b).count() as f64;
    intersection / union
}
