mod file_config;

pub use file_config::{CacheConfig, FileConfig, GeminiConfig, SpotifyFileConfig};

use crate::cache::DEFAULT_CACHE_TTL;
use crate::resolver::{SpotifyConfig, SPOTIFY_ACCOUNTS_BASE, SPOTIFY_API_BASE};
use crate::server::RequestsLoggingLevel;
use crate::synthesizer::{GenerationOptions, DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
use anyhow::{anyhow, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MARKET: &str = "TW";
pub const DEFAULT_GEMINI_TIMEOUT_SEC: u64 = 30;
pub const DEFAULT_SPOTIFY_TIMEOUT_SEC: u64 = 10;
pub const DEFAULT_CACHE_OP_TIMEOUT_MS: u64 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.4;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub redis_url: Option<String>,
    pub cache_ttl_sec: u64,
    pub history_db_path: Option<PathBuf>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_market: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            logging_level: RequestsLoggingLevel::default(),
            redis_url: None,
            cache_ttl_sec: DEFAULT_CACHE_TTL.as_secs(),
            history_db_path: None,
            gemini_api_key: None,
            gemini_model: None,
            spotify_client_id: None,
            spotify_client_secret: None,
            spotify_market: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    /// `None` means the in-process cache is used.
    pub redis_url: Option<String>,
    pub history_db_path: Option<PathBuf>,
    pub enable_cors: bool,

    pub cache: CacheSettings,
    pub gemini: GeminiSettings,
    pub spotify: SpotifySettings,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub ttl_sec: u64,
    pub op_timeout_ms: u64,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_sec)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_sec: u64,
    pub temperature: f32,
}

impl GeminiSettings {
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_sec),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub market: String,
    pub accounts_url: String,
    pub api_url: String,
    pub timeout_sec: u64,
}

impl SpotifySettings {
    pub fn resolver_config(&self) -> SpotifyConfig {
        SpotifyConfig {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            market: self.market.clone(),
            accounts_url: self.accounts_url.clone(),
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_sec),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());
        let redis_url = non_empty(file.redis_url).or_else(|| non_empty(cli.redis_url.clone()));
        let history_db_path = file
            .history_db_path
            .map(PathBuf::from)
            .or_else(|| cli.history_db_path.clone());
        let enable_cors = file.enable_cors.unwrap_or(true);

        let cache_file = file.cache.unwrap_or_default();
        let cache = CacheSettings {
            ttl_sec: file.cache_ttl_sec.unwrap_or(cli.cache_ttl_sec),
            op_timeout_ms: cache_file
                .op_timeout_ms
                .unwrap_or(DEFAULT_CACHE_OP_TIMEOUT_MS),
        };
        if cache.ttl_sec == 0 {
            return Err(anyhow!("cache_ttl_sec must be greater than zero"));
        }

        let gemini_file = file.gemini.unwrap_or_default();
        let gemini = GeminiSettings {
            api_key: non_empty(gemini_file.api_key)
                .or_else(|| non_empty(cli.gemini_api_key.clone()))
                .ok_or_else(|| {
                    anyhow!("Gemini API key must be specified via --gemini-api-key, GEMINI_API_KEY or [gemini] api_key")
                })?,
            model: non_empty(gemini_file.model)
                .or_else(|| non_empty(cli.gemini_model.clone()))
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: gemini_file
                .base_url
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            timeout_sec: gemini_file
                .timeout_sec
                .unwrap_or(DEFAULT_GEMINI_TIMEOUT_SEC),
            temperature: gemini_file.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        };

        let spotify_file = file.spotify.unwrap_or_default();
        let spotify = SpotifySettings {
            client_id: non_empty(spotify_file.client_id)
                .or_else(|| non_empty(cli.spotify_client_id.clone()))
                .ok_or_else(|| {
                    anyhow!("Spotify client id must be specified via --spotify-client-id, SPOTIFY_CLIENT_ID or [spotify] client_id")
                })?,
            client_secret: non_empty(spotify_file.client_secret)
                .or_else(|| non_empty(cli.spotify_client_secret.clone()))
                .ok_or_else(|| {
                    anyhow!("Spotify client secret must be specified via --spotify-client-secret, SPOTIFY_CLIENT_SECRET or [spotify] client_secret")
                })?,
            market: non_empty(spotify_file.market)
                .or_else(|| non_empty(cli.spotify_market.clone()))
                .unwrap_or_else(|| DEFAULT_MARKET.to_string()),
            accounts_url: spotify_file
                .accounts_url
                .unwrap_or_else(|| SPOTIFY_ACCOUNTS_BASE.to_string()),
            api_url: spotify_file
                .api_url
                .unwrap_or_else(|| SPOTIFY_API_BASE.to_string()),
            timeout_sec: spotify_file
                .timeout_sec
                .unwrap_or(DEFAULT_SPOTIFY_TIMEOUT_SEC),
        };

        Ok(Self {
            port,
            logging_level,
            redis_url,
            history_db_path,
            enable_cors,
            cache,
            gemini,
            spotify,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
