use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use jobscout::aggregator::{Aggregator, RoleFilter};
use jobscout::catalog::load_catalog;
use jobscout::collectors::{self, ats::AtsCollector};
use jobscout::config::{Command, Config};
use jobscout::matching::MatchScorer;
use jobscout::models::query::SearchQuery;
use jobscout::notify::LogNotifier;
use jobscout::pipeline::{MatchOptions, Pipeline};
use jobscout::routes;
use jobscout::store::MemoryStore;
use jobscout::text::{SkillExtractor, TextNormalizer};

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobscout=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();
    let pipeline = Arc::new(build_pipeline(&config)?);

    match config.resolved_command() {
        Command::Serve { listen_addr } => serve(pipeline, &listen_addr).await,
        Command::Search {
            keywords,
            location,
            country,
            max,
            no_ats,
        } => {
            let query = SearchQuery {
                keywords,
                location,
                country,
                max_per_source: max,
                role_filter: None,
            };
            let jobs = pipeline.live_search(&query, !no_ats).await;
            println!("{}", serde_json::to_string_pretty(&jobs)?);
            Ok(())
        }
        Command::Match {
            resume,
            keywords,
            threshold,
        } => {
            let resume_text = std::fs::read_to_string(&resume)
                .with_context(|| format!("reading resume {}", resume.display()))?;
            let options = MatchOptions {
                keywords,
                threshold: Some(threshold),
                ..MatchOptions::default()
            };
            let matches = pipeline.match_resume(&resume_text, &options).await?;
            println!("{}", serde_json::to_string_pretty(&matches)?);
            Ok(())
        }
    }
}

fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let client = collectors::build_client(&config.fetch_config())?;
    let extractor = SkillExtractor::default();
    let scorer = MatchScorer::new(TextNormalizer::default(), config.similarity);

    let boards = collectors::default_boards(&client, &extractor);
    let companies = AtsCollector::new(client)?;
    let role_filter = RoleFilter::default();
    let aggregator = Aggregator::new(
        boards,
        Some(Arc::new(companies)),
        role_filter.clone(),
        config.aggregator_config(),
    );

    let catalog = load_catalog(&config.catalog);
    if !catalog.is_empty() {
        tracing::info!("Loaded {} catalog companies", catalog.len());
    }

    Ok(Pipeline::new(
        aggregator,
        catalog,
        Arc::new(MemoryStore::new()),
        Arc::new(LogNotifier),
        scorer,
        extractor,
        role_filter,
    ))
}

async fn serve(pipeline: Arc<Pipeline>, listen_addr: &str) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/healthz", get(healthz))
        .merge(routes::api::router(pipeline))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("Listening on {listen_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
