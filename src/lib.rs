//! Audiophile Proof Server Library
//!
//! Recommends a reference test track for a pair of headphones. This library
//! exposes the internal modules for testing and potential reuse.

pub mod cache;
pub mod config;
pub mod history;
pub mod recommendation;
pub mod resolver;
pub mod server;
pub mod sqlite_persistence;
pub mod synthesizer;

// Re-export commonly used types for convenience
pub use cache::{InMemoryRecommendationCache, RecommendationCache, RedisRecommendationCache};
pub use history::{NoOpSearchLog, SearchLog, SqliteSearchLog};
pub use recommendation::{RecommendError, RecommendationOrchestrator, RecommendationRecord};
pub use resolver::{SpotifyResolver, TrackResolver};
pub use server::{run_server, RequestsLoggingLevel};
pub use synthesizer::{LlmSpecSynthesizer, SpecSynthesizer};
