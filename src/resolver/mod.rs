//! Resolution of a free-text song query to one concrete catalog track.

mod spotify;

pub use spotify::{SpotifyConfig, SpotifyResolver, SPOTIFY_ACCOUNTS_BASE, SPOTIFY_API_BASE};

use crate::recommendation::ResolvedTrack;
use async_trait::async_trait;
use thiserror::Error;

/// Why a query could not be resolved.
///
/// `NotFound` means the catalog answered and had nothing; every other variant
/// means we could not get a trustworthy answer at all.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No track matches query: {0}")]
    NotFound(String),

    #[error("Catalog authentication failed: {0}")]
    Auth(String),

    #[error("Catalog request failed: {0}")]
    Transport(String),

    #[error("Catalog request timed out")]
    Timeout,

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Returns the top catalog match for `query`.
    async fn resolve(&self, query: &str) -> Result<ResolvedTrack, ResolveError>;
}
