use serde::{Deserialize, Serialize};

/// Search input shared by every collector invocation in one aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_max_per_source")]
    pub max_per_source: usize,
    /// Overrides the aggregator's built-in role tokens when set.
    #[serde(default)]
    pub role_filter: Option<Vec<String>>,
}

fn default_country() -> String {
    "India".to_string()
}

fn default_max_per_source() -> usize {
    10
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keywords: String::new(),
            location: String::new(),
            country: default_country(),
            max_per_source: default_max_per_source(),
            role_filter: None,
        }
    }
}

impl SearchQuery {
    pub fn with_keywords(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            ..Self::default()
        }
    }

    /// True when the query targets India, either explicitly by country or
    /// through the location text.
    pub fn targets_india(&self) -> bool {
        let loc = self.location.to_lowercase();
        self.country.eq_ignore_ascii_case("india") || loc == "india" || loc == "in"
    }
}
