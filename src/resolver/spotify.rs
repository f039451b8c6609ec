//! Spotify Web API track resolver.
//!
//! Authenticates with the client-credentials grant and keeps the bearer token
//! until shortly before it expires. A 401 on search drops the token and the
//! search is retried once with a fresh one.

use super::{ResolveError, TrackResolver};
use crate::recommendation::ResolvedTrack;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const SPOTIFY_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";
pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com";

/// Tokens are refreshed this long before Spotify says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;
/// Upper bound on how long a token is trusted, whatever `expires_in` claims.
const MAX_TOKEN_LIFETIME_SECS: u64 = 24 * 3600;

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    /// ISO 3166-1 alpha-2 market the search is scoped to.
    pub market: String,
    pub accounts_url: String,
    pub api_url: String,
    /// Applied to the token exchange and to the search, separately.
    pub timeout: Duration,
}

impl SpotifyConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            market: "TW".to_string(),
            accounts_url: SPOTIFY_ACCOUNTS_BASE.to_string(),
            api_url: SPOTIFY_API_BASE.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

pub struct SpotifyResolver {
    client: Client,
    config: SpotifyConfig,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<SpotifyTrack>,
}

#[derive(Deserialize)]
struct SpotifyTrack {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    album: Option<SpotifyAlbum>,
    preview_url: Option<String>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Deserialize)]
struct SpotifyArtist {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct SpotifyAlbum {
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

#[derive(Deserialize)]
struct SpotifyImage {
    url: String,
}

#[derive(Deserialize, Default)]
struct ExternalUrls {
    spotify: Option<String>,
}

impl From<SpotifyTrack> for ResolvedTrack {
    fn from(track: SpotifyTrack) -> Self {
        ResolvedTrack {
            title: track.name,
            artist: track
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_default(),
            cover_url: track
                .album
                .and_then(|album| album.images.into_iter().next())
                .map(|image| image.url)
                .unwrap_or_default(),
            spotify_url: track.external_urls.spotify.unwrap_or_default(),
            track_id: track.id,
            preview_url: track.preview_url.filter(|url| !url.is_empty()),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> ResolveError {
    if e.is_timeout() {
        ResolveError::Timeout
    } else {
        ResolveError::Transport(e.to_string())
    }
}

enum SearchOutcome {
    Found(ResolvedTrack),
    Unauthorized,
}

impl SpotifyResolver {
    pub fn new(config: SpotifyConfig) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        let config = SpotifyConfig {
            accounts_url: config.accounts_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self {
            client,
            config,
            token: Mutex::new(None),
        })
    }

    fn basic_credentials(&self) -> String {
        let raw = format!("{}:{}", self.config.client_id, self.config.client_secret);
        format!("Basic {}", BASE64.encode(raw))
    }

    /// Client-credentials exchange. Has no fallback: any failure is an auth error.
    async fn request_token(&self) -> Result<CachedToken, ResolveError> {
        let url = format!("{}/api/token", self.config.accounts_url);
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, self.basic_credentials())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ResolveError::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::Auth(format!("unreadable token response: {}", e)))?;

        let value = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ResolveError::Auth("token response has no access_token".to_string()))?;

        let lifetime = Duration::from_secs(
            body.expires_in
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
                .min(MAX_TOKEN_LIFETIME_SECS),
        );
        let refresh_at = Instant::now()
            .checked_add(lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN))
            .ok_or_else(|| {
                ResolveError::InvalidResponse(format!(
                    "token lifetime out of range: {}s",
                    lifetime.as_secs()
                ))
            })?;
        debug!("Obtained Spotify token valid for {}s", lifetime.as_secs());

        Ok(CachedToken { value, refresh_at })
    }

    async fn bearer_token(&self) -> Result<String, ResolveError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }
        let token = self.request_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    async fn search(&self, query: &str, token: &str) -> Result<SearchOutcome, ResolveError> {
        let url = format!("{}/v1/search", self.config.api_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("q", query),
                ("type", "track"),
                ("limit", "1"),
                ("market", self.config.market.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Ok(SearchOutcome::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResolveError::Transport(format!(
                "search returned {}: {}",
                status, body
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::InvalidResponse(e.to_string()))?;

        body.tracks
            .and_then(|page| page.items.into_iter().next())
            .map(|track| SearchOutcome::Found(track.into()))
            .ok_or_else(|| ResolveError::NotFound(query.to_string()))
    }
}

#[async_trait]
impl TrackResolver for SpotifyResolver {
    async fn resolve(&self, query: &str) -> Result<ResolvedTrack, ResolveError> {
        let token = self.bearer_token().await?;
        match self.search(query, &token).await? {
            SearchOutcome::Found(track) => {
                info!("Resolved '{}' to {} - {}", query, track.title, track.artist);
                Ok(track)
            }
            SearchOutcome::Unauthorized => {
                warn!("Spotify rejected cached token, requesting a new one");
                self.invalidate_token().await;
                let token = self.bearer_token().await?;
                match self.search(query, &token).await? {
                    SearchOutcome::Found(track) => Ok(track),
                    SearchOutcome::Unauthorized => Err(ResolveError::Auth(
                        "search rejected a freshly issued token".to_string(),
                    )),
                }
            }
        }
    }
}
