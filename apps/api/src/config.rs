use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Present only when an LLM-backed capability is enabled.
    pub anthropic_api_key: Option<String>,
    pub enable_llm_classifier: bool,
    pub enable_llm_ranker: bool,
    /// Classifications below this confidence are rejected, not defaulted.
    pub min_classifier_confidence: f32,
    /// Budget for a single external classify/rank call.
    pub capability_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let enable_llm_classifier = env_flag("ENABLE_LLM_CLASSIFIER");
        let enable_llm_ranker = env_flag("ENABLE_LLM_RANKER");
        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();

        if (enable_llm_classifier || enable_llm_ranker) && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY is required when an LLM backend is enabled");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key,
            enable_llm_classifier,
            enable_llm_ranker,
            min_classifier_confidence: std::env::var("MIN_CLASSIFIER_CONFIDENCE")
                .unwrap_or_else(|_| "0.35".to_string())
                .parse::<f32>()
                .context("MIN_CLASSIFIER_CONFIDENCE must be a number in [0, 1]")?,
            capability_timeout_secs: std::env::var("CAPABILITY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("CAPABILITY_TIMEOUT_SECS must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}
