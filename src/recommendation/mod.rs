mod key;
mod models;
mod orchestrator;

pub use key::{derive_key, CacheKey};
pub use models::{
    HardwareSpecs, RecommendationRecord, ResolvedTrack, SynthesisResult, UNKNOWN,
};
pub use orchestrator::{RecommendError, RecommendationOrchestrator};
