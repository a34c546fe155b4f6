mod classify;
mod config;
mod coordinator;
mod db;
mod errors;
mod handlers;
mod llm_client;
mod rank;
mod routes;
mod state;
mod store;
mod taxonomy;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::classify::{Classifier, KeywordClassifier, LlmClassifier};
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::db::{create_pool, init_schema};
use crate::llm_client::LlmClient;
use crate::rank::{KeywordRanker, LlmRanker, Ranker};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::CandidateStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jdrouter v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite
    let pool = create_pool(&config.database_url).await?;
    init_schema(&pool).await?;
    let store = CandidateStore::new(pool);

    // Both pipeline call sites (ingestion and JD queries) share one
    // classifier instance so routing stays consistent.
    let classifier: Arc<dyn Classifier> = if config.enable_llm_classifier {
        let llm = LlmClient::new(require_api_key(&config)?);
        info!("Classifier backend: llm (model: {})", llm_client::MODEL);
        Arc::new(LlmClassifier::new(llm, config.min_classifier_confidence))
    } else {
        info!("Classifier backend: keyword");
        Arc::new(KeywordClassifier::new(config.min_classifier_confidence))
    };

    let ranker: Arc<dyn Ranker> = if config.enable_llm_ranker {
        let llm = LlmClient::new(require_api_key(&config)?);
        info!("Ranker backend: llm (model: {})", llm_client::MODEL);
        Arc::new(LlmRanker::new(llm))
    } else {
        info!("Ranker backend: keyword");
        Arc::new(KeywordRanker)
    };

    let coordinator = Coordinator::new(
        store.clone(),
        classifier,
        ranker,
        Duration::from_secs(config.capability_timeout_secs),
    );

    let state = AppState {
        coordinator,
        store,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn require_api_key(config: &Config) -> Result<String> {
    config
        .anthropic_api_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("ANTHROPIC_API_KEY is not set"))
}
