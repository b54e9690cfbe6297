//! Text canonicalization shared by the match scorer and skill extraction.

use std::collections::HashSet;

/// English stopwords removed during normalization. The default set is the
/// small dependency-free list; callers can inject a larger one.
#[derive(Debug, Clone)]
pub struct Stopwords(HashSet<String>);

const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "while", "with", "without", "to", "from", "of",
    "in", "on", "for", "by", "as", "at", "is", "are", "was", "were", "be", "been", "being", "this",
    "that", "these", "those", "it", "its", "into",
];

impl Default for Stopwords {
    fn default() -> Self {
        Self(DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect())
    }
}

impl Stopwords {
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        Self(words.into_iter().map(|w| w.to_lowercase()).collect())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }
}

/// Canonicalizes free text: lowercases, replaces every character that is
/// neither alphabetic nor `_` with a space (dropping punctuation and
/// digits), removes stopwords, and rejoins the surviving tokens with
/// single spaces. Deterministic and free of shared state.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    stopwords: Stopwords,
}

impl TextNormalizer {
    pub fn new(stopwords: Stopwords) -> Self {
        Self { stopwords }
    }

    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let cleaned: String = lowered
            .chars()
            .map(|c| if c.is_alphabetic() || c == '_' { c } else { ' ' })
            .collect();
        cleaned
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Static vocabulary of technology and skill terms. Not learned; injectable
/// so tests and deployments can substitute their own list.
#[derive(Debug, Clone)]
pub struct SkillVocabulary(Vec<String>);

const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "angular",
    "vue",
    "node",
    "django",
    "flask",
    "spring",
    "sql",
    "nosql",
    "mongodb",
    "postgresql",
    "mysql",
    "oracle",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "ci/cd",
    "git",
    "agile",
    "scrum",
    "machine learning",
    "data science",
    "ai",
    "devops",
    "frontend",
    "backend",
    "fullstack",
    "mobile",
    "android",
    "ios",
    "swift",
    "kotlin",
    "react native",
    "flutter",
    "ui/ux",
    "html",
    "css",
    "sass",
    "less",
    "bootstrap",
    "tailwind",
    "typescript",
    "c#",
    "c++",
    "php",
    "ruby",
    "rails",
    "go",
    "rust",
    "scala",
];

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self(DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect())
    }
}

impl SkillVocabulary {
    /// Terms are folded to lowercase; duplicates keep their first position.
    pub fn new(terms: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for term in terms {
            let term = term.to_lowercase();
            if seen.insert(term.clone()) {
                out.push(term);
            }
        }
        Self(out)
    }

    pub fn terms(&self) -> &[String] {
        &self.0
    }
}

/// Scans normalized text for exact word-boundary occurrences of vocabulary
/// terms. Multi-word terms must appear with their words adjacent. Terms
/// containing characters the normalizer strips (e.g. "c++", "ci/cd") can
/// never match; that mirrors the matching space the scorer operates in.
#[derive(Debug, Clone, Default)]
pub struct SkillExtractor {
    normalizer: TextNormalizer,
    vocabulary: SkillVocabulary,
}

impl SkillExtractor {
    pub fn new(normalizer: TextNormalizer, vocabulary: SkillVocabulary) -> Self {
        Self {
            normalizer,
            vocabulary,
        }
    }

    /// Matching terms in vocabulary order, without duplicates.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let padded = format!(" {} ", self.normalizer.normalize(text));
        self.vocabulary
            .terms()
            .iter()
            .filter(|term| padded.contains(&format!(" {term} ")))
            .cloned()
            .collect()
    }
}
