//! Shared constants for end-to-end tests
//!
//! When stub data changes (song queries, catalog tracks, etc.),
//! update only this file.

// ============================================================================
// Headphones
// ============================================================================

/// Brand the stub synthesizer knows a good track for
pub const KNOWN_BRAND: &str = "Sony";

/// Model paired with KNOWN_BRAND
pub const KNOWN_MODEL: &str = "WH-1000XM5";

/// Brand for which the stub synthesizer suggests a song the catalog lacks
pub const OBSCURE_BRAND: &str = "Obscure";

/// Model paired with OBSCURE_BRAND
pub const OBSCURE_MODEL: &str = "X-1";

// ============================================================================
// Synthesis
// ============================================================================

pub const KNOWN_SONG_QUERY: &str = "Hotel California - Eagles";

pub const MISSING_SONG_QUERY: &str = "Song That Does Not Exist - Nobody";

pub const STUB_FORM_FACTOR: &str = "over-ear";

pub const STUB_SOUND_FEATURES: [&str; 2] = ["warm", "spacious"];

// ============================================================================
// Catalog
// ============================================================================

pub const TRACK_TITLE: &str = "Hotel California";

pub const TRACK_ARTIST: &str = "Eagles";

pub const TRACK_ID: &str = "40riOy7x9W7GXjyGp4pjAv";

pub const TRACK_COVER_URL: &str = "https://i.scdn.co/image/hotel-california";

pub const TRACK_SPOTIFY_URL: &str = "https://open.spotify.com/track/40riOy7x9W7GXjyGp4pjAv";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
