//! The JSON contract the generative provider must fulfil, and what we use
//! instead when it does not.

use super::SynthesisError;
use crate::recommendation::{HardwareSpecs, SynthesisResult};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

pub const FALLBACK_SONG_QUERY: &str = "Hotel California - Live";
pub const FALLBACK_SOUND_FEATURES: [&str; 2] = ["Balanced", "Detailed"];
pub const FALLBACK_SUMMARY: &str =
    "Sorry, the AI analysis is unavailable right now. Here is a classic reference track to start with.";

/// Content returned whenever synthesis fails. Always identical.
pub fn fallback_synthesis() -> SynthesisResult {
    SynthesisResult {
        specs: HardwareSpecs::unknown(),
        sound_features: FALLBACK_SOUND_FEATURES
            .iter()
            .map(|s| s.to_string())
            .collect(),
        song_query: FALLBACK_SONG_QUERY.to_string(),
        summary: FALLBACK_SUMMARY.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct RawSynthesis {
    specs: RawSpecs,
    sound_features: Vec<String>,
    song_query: String,
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RawSpecs {
    #[serde(deserialize_with = "text_or_number")]
    form_factor: String,
    #[serde(deserialize_with = "text_or_number")]
    connection: String,
    #[serde(deserialize_with = "text_or_number")]
    year: String,
    #[serde(deserialize_with = "text_or_number")]
    price: String,
    #[serde(deserialize_with = "text_or_number")]
    driver: String,
}

/// Models occasionally emit `"year": 2019`; the value is still usable text.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Strictly parses provider output. Anything that is not exactly the
/// expected JSON object is an error; no repair is attempted.
pub fn parse_synthesis(raw: &str) -> Result<SynthesisResult, SynthesisError> {
    let parsed: RawSynthesis =
        serde_json::from_str(raw).map_err(|e| SynthesisError::Malformed(e.to_string()))?;

    let song_query = parsed.song_query.trim().to_string();
    if song_query.is_empty() {
        return Err(SynthesisError::Incomplete("song_query is empty".to_string()));
    }

    Ok(SynthesisResult {
        specs: HardwareSpecs {
            form_factor: parsed.specs.form_factor,
            connection: parsed.specs.connection,
            year: parsed.specs.year,
            price: parsed.specs.price,
            driver: parsed.specs.driver,
        },
        sound_features: parsed.sound_features,
        song_query,
        summary: parsed.summary,
    })
}
