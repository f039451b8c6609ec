//! Records produced and consumed by the recommendation pipeline.

use serde::{Deserialize, Serialize};

/// Sentinel used for any hardware descriptor nobody could determine.
pub const UNKNOWN: &str = "Unknown";

/// The unit of value returned to clients and stored in the cache.
///
/// Every field except `preview_url` is always present; an empty string or
/// [`UNKNOWN`] stands in for data that could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub form_factor: String,
    #[serde(alias = "connection")]
    pub connection_type: String,
    pub release_year: String,
    pub price_range: String,
    pub driver_config: String,
    pub sound_features: Vec<String>,
    pub title: String,
    pub artist: String,
    pub comment: String,
    pub cover_url: String,
    pub spotify_url: String,
    pub track_id: String,
    /// Many tracks have no preview clip for licensing reasons.
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl RecommendationRecord {
    /// Merges the synthesized hardware description with the resolved track.
    pub fn assemble(synthesis: SynthesisResult, track: ResolvedTrack) -> Self {
        let SynthesisResult {
            specs,
            sound_features,
            summary,
            ..
        } = synthesis;
        Self {
            form_factor: specs.form_factor,
            connection_type: specs.connection,
            release_year: specs.year,
            price_range: specs.price,
            driver_config: specs.driver,
            sound_features,
            title: track.title,
            artist: track.artist,
            comment: summary,
            cover_url: track.cover_url,
            spotify_url: track.spotify_url,
            track_id: track.track_id,
            preview_url: track.preview_url,
        }
    }
}

/// Hardware descriptors as the generative provider reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareSpecs {
    pub form_factor: String,
    pub connection: String,
    pub year: String,
    pub price: String,
    pub driver: String,
}

impl HardwareSpecs {
    pub fn unknown() -> Self {
        Self {
            form_factor: UNKNOWN.to_string(),
            connection: UNKNOWN.to_string(),
            year: UNKNOWN.to_string(),
            price: UNKNOWN.to_string(),
            driver: UNKNOWN.to_string(),
        }
    }
}

/// Output of the synthesizer, consumed immediately by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    pub specs: HardwareSpecs,
    pub sound_features: Vec<String>,
    pub song_query: String,
    pub summary: String,
}

/// A concrete catalog track matching a song query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub title: String,
    pub artist: String,
    pub cover_url: String,
    pub spotify_url: String,
    pub track_id: String,
    pub preview_url: Option<String>,
}
