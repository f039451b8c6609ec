//! Hardware spec and test-track synthesis on top of a generative provider.
//!
//! The provider is asked for a fixed JSON shape (see [`contract`]). When it
//! is unreachable or answers with anything else, the synthesizer returns
//! [`fallback_synthesis`] so the pipeline can still recommend a track.

pub mod contract;
mod gemini;
mod prompt;
mod provider;

pub use contract::{fallback_synthesis, parse_synthesis};
pub use gemini::{GeminiProvider, DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
pub use prompt::build_prompt;
pub use provider::{GenerationOptions, GenerativeProvider, LlmError};

use crate::recommendation::SynthesisResult;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),

    #[error("Malformed provider output: {0}")]
    Malformed(String),

    #[error("Incomplete provider output: {0}")]
    Incomplete(String),
}

/// Produces a spec summary and song query for a headphone. Never fails.
#[async_trait]
pub trait SpecSynthesizer: Send + Sync {
    async fn synthesize(&self, brand: &str, model: &str) -> SynthesisResult;
}

/// [`SpecSynthesizer`] backed by a [`GenerativeProvider`].
pub struct LlmSpecSynthesizer {
    provider: Arc<dyn GenerativeProvider>,
    options: GenerationOptions,
}

impl LlmSpecSynthesizer {
    pub fn new(provider: Arc<dyn GenerativeProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    /// One provider round trip, with the failure left visible.
    pub async fn try_synthesize(
        &self,
        brand: &str,
        model: &str,
    ) -> Result<SynthesisResult, SynthesisError> {
        let prompt = build_prompt(brand, model);
        let raw = self.provider.generate_json(&prompt, &self.options).await?;
        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            bytes = raw.len(),
            "Received synthesis output"
        );
        parse_synthesis(&raw)
    }
}

#[async_trait]
impl SpecSynthesizer for LlmSpecSynthesizer {
    async fn synthesize(&self, brand: &str, model: &str) -> SynthesisResult {
        match self.try_synthesize(brand, model).await {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    "Synthesis failed for {} {}, using fallback: {}",
                    brand, model, err
                );
                fallback_synthesis()
            }
        }
    }
}
