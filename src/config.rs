use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::aggregator::AggregatorConfig;
use crate::collectors::{DEFAULT_USER_AGENT, FetchConfig};
use crate::matching::Similarity;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "jobscout",
    about = "Multi-source job search aggregator with resume matching"
)]
pub struct Config {
    /// Company catalog files (JSON array or "Name - URL" lines); repeatable
    #[arg(long, env = "CATALOG_PATHS", value_delimiter = ',')]
    pub catalog: Vec<PathBuf>,

    /// User-Agent header sent to external sources
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Timeout for a single source fetch, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value = "15")]
    pub fetch_timeout_secs: u64,

    /// Wall-clock bound on one whole search, in seconds
    #[arg(long, env = "SEARCH_TIMEOUT_SECS", default_value = "45")]
    pub search_timeout_secs: u64,

    /// Similarity method used by the match scorer
    #[arg(long, env = "SIMILARITY", value_enum, default_value = "tfidf")]
    pub similarity: Similarity,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the web server (default when no subcommand given)
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,
    },
    /// Run one live search and print the results as JSON
    Search {
        /// Search keywords
        #[arg(long, default_value = "")]
        keywords: String,

        /// Location text (a city, or "India")
        #[arg(long, default_value = "")]
        location: String,

        /// Country hint
        #[arg(long, default_value = "India")]
        country: String,

        /// Maximum results per source
        #[arg(long, default_value = "10")]
        max: usize,

        /// Skip the company catalog sources
        #[arg(long)]
        no_ats: bool,
    },
    /// Match a resume against searched jobs and print the ranked list as JSON
    Match {
        /// Path to the resume's extracted plain text
        #[arg(long)]
        resume: PathBuf,

        /// Search keywords (default: skills extracted from the resume)
        #[arg(long)]
        keywords: Option<String>,

        /// Minimum match score in [0, 100]
        #[arg(long, default_value = "60.0")]
        threshold: f64,
    },
}

impl Config {
    /// Resolve the command, defaulting to Serve if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }

    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            global_timeout: Duration::from_secs(self.search_timeout_secs),
            ..AggregatorConfig::default()
        }
    }
}
