use anyhow::{Context, Result};
use audiophile_proof_server::cache::{
    InMemoryRecommendationCache, RecommendationCache, RedisRecommendationCache,
};
use audiophile_proof_server::config::{AppConfig, CliConfig, FileConfig};
use audiophile_proof_server::history::{NoOpSearchLog, SearchLog, SqliteSearchLog};
use audiophile_proof_server::recommendation::RecommendationOrchestrator;
use audiophile_proof_server::resolver::SpotifyResolver;
use audiophile_proof_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use audiophile_proof_server::synthesizer::{GeminiProvider, LlmSpecSynthesizer};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in it override the flags below.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Redis connection URL. Without it recommendations are cached in memory.
    #[clap(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// How long a recommendation stays cached, in seconds.
    #[clap(long, default_value_t = 3600)]
    pub cache_ttl_sec: u64,

    /// SQLite file recording every search. Searches are not recorded when omitted.
    #[clap(long)]
    pub history_db_path: Option<PathBuf>,

    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for spec synthesis.
    #[clap(long)]
    pub gemini_model: Option<String>,

    #[clap(long, env = "SPOTIFY_CLIENT_ID")]
    pub spotify_client_id: Option<String>,

    #[clap(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,

    /// Spotify market (ISO 3166-1 alpha-2) searches are scoped to.
    #[clap(long)]
    pub spotify_market: Option<String>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            logging_level: self.logging_level.clone(),
            redis_url: self.redis_url.clone(),
            cache_ttl_sec: self.cache_ttl_sec,
            history_db_path: self.history_db_path.clone(),
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_model: self.gemini_model.clone(),
            spotify_client_id: self.spotify_client_id.clone(),
            spotify_client_secret: self.spotify_client_secret.clone(),
            spotify_market: self.spotify_market.clone(),
        }
    }
}

fn build_cache(config: &AppConfig) -> Arc<dyn RecommendationCache> {
    let Some(url) = &config.redis_url else {
        warn!("No Redis URL configured, caching recommendations in memory");
        return Arc::new(InMemoryRecommendationCache::new(config.cache.ttl()));
    };

    match RedisRecommendationCache::new(url, config.cache.ttl(), config.cache.op_timeout()) {
        Ok(cache) => {
            info!("Caching recommendations in Redis");
            Arc::new(cache)
        }
        Err(err) => {
            warn!("Invalid Redis configuration ({}), caching in memory", err);
            Arc::new(InMemoryRecommendationCache::new(config.cache.ttl()))
        }
    }
}

fn build_search_log(config: &AppConfig) -> Result<Arc<dyn SearchLog>> {
    match &config.history_db_path {
        Some(path) => {
            info!("Recording searches to {:?}", path);
            Ok(Arc::new(SqliteSearchLog::new(path)?))
        }
        None => {
            info!("No history database configured, searches are not recorded");
            Ok(Arc::new(NoOpSearchLog))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)
        .context("Invalid configuration")?;

    let cache = build_cache(&config);

    info!(
        "Using Gemini model {} for spec synthesis",
        config.gemini.model
    );
    let provider = Arc::new(GeminiProvider::new(
        config.gemini.base_url.clone(),
        config.gemini.model.clone(),
        config.gemini.api_key.clone(),
    ));
    let synthesizer = Arc::new(LlmSpecSynthesizer::new(
        provider,
        config.gemini.generation_options(),
    ));

    let resolver = Arc::new(
        SpotifyResolver::new(config.spotify.resolver_config())
            .context("Failed to create Spotify client")?,
    );

    let orchestrator = Arc::new(RecommendationOrchestrator::new(
        cache,
        synthesizer,
        resolver,
    ));
    let search_log = build_search_log(&config)?;

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        enable_cors: config.enable_cors,
    };

    info!("Ready to serve at port {}!", config.port);
    run_server(server_config, orchestrator, search_log).await
}
