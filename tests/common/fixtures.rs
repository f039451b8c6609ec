//! Stub collaborators for the recommendation pipeline
//!
//! Both stubs count their calls and can be switched into an outage, so tests
//! can tell a cached answer from a freshly computed one.

use super::constants::*;
use async_trait::async_trait;
use audiophile_proof_server::recommendation::{HardwareSpecs, ResolvedTrack, SynthesisResult};
use audiophile_proof_server::resolver::{ResolveError, TrackResolver};
use audiophile_proof_server::synthesizer::{fallback_synthesis, SpecSynthesizer};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
pub struct StubSynthesizer {
    calls: AtomicUsize,
    outage: AtomicBool,
    delay_ms: AtomicUsize,
}

#[allow(dead_code)]
impl StubSynthesizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// While in outage the synthesizer answers with its fallback content.
    pub fn set_outage(&self, outage: bool) {
        self.outage.store(outage, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms
            .store(delay.as_millis() as usize, Ordering::SeqCst);
    }
}

#[async_trait]
impl SpecSynthesizer for StubSynthesizer {
    async fn synthesize(&self, brand: &str, _model: &str) -> SynthesisResult {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }

        if self.outage.load(Ordering::SeqCst) {
            return fallback_synthesis();
        }

        let song_query = if brand.eq_ignore_ascii_case(OBSCURE_BRAND) {
            MISSING_SONG_QUERY
        } else {
            KNOWN_SONG_QUERY
        };

        SynthesisResult {
            specs: HardwareSpecs {
                form_factor: STUB_FORM_FACTOR.to_string(),
                connection: "Bluetooth 5.2 / 3.5mm".to_string(),
                year: "2022".to_string(),
                price: "$399".to_string(),
                driver: "30mm dynamic".to_string(),
            },
            sound_features: STUB_SOUND_FEATURES.iter().map(|s| s.to_string()).collect(),
            song_query: song_query.to_string(),
            summary: "Focus on the twelve-string guitar in the intro.".to_string(),
        }
    }
}

#[derive(Default)]
pub struct StubResolver {
    calls: AtomicUsize,
    outage: AtomicBool,
}

#[allow(dead_code)]
impl StubResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// While in outage every call fails at the transport level.
    pub fn set_outage(&self, outage: bool) {
        self.outage.store(outage, Ordering::SeqCst);
    }
}

#[async_trait]
impl TrackResolver for StubResolver {
    async fn resolve(&self, query: &str) -> Result<ResolvedTrack, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.outage.load(Ordering::SeqCst) {
            return Err(ResolveError::Transport("connection refused".to_string()));
        }
        if query != KNOWN_SONG_QUERY {
            return Err(ResolveError::NotFound(query.to_string()));
        }

        Ok(ResolvedTrack {
            title: TRACK_TITLE.to_string(),
            artist: TRACK_ARTIST.to_string(),
            cover_url: TRACK_COVER_URL.to_string(),
            spotify_url: TRACK_SPOTIFY_URL.to_string(),
            track_id: TRACK_ID.to_string(),
            preview_url: None,
        })
    }
}
