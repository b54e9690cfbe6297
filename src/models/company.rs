use serde::{Deserialize, Serialize};

/// One company entry point for the ATS/career-page collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub career_url: String,
}

impl CompanyEntry {
    pub fn new(name: impl Into<String>, career_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            career_url: career_url.into(),
        }
    }
}

/// Canonical form of a career URL used for catalog deduplication: the
/// scheme and host are lowercased, a trailing path separator is trimmed,
/// and the rest of the path is left as-is.
pub fn normalize_career_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    match trimmed.find("://") {
        Some(scheme_end) => {
            let after_scheme = scheme_end + 3;
            let host_end = trimmed[after_scheme..]
                .find('/')
                .map(|i| after_scheme + i)
                .unwrap_or(trimmed.len());
            let mut out = trimmed[..host_end].to_lowercase();
            out.push_str(&trimmed[host_end..]);
            out
        }
        // Not URL-shaped; fold the whole string so case variants collapse.
        None => trimmed.to_lowercase(),
    }
}
