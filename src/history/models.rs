use crate::recommendation::{RecommendError, RecommendationRecord};

pub const SEARCH_HEADPHONE_EVENT: &str = "search_headphone";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Ok,
    NotFound,
    ProviderError,
}

impl SearchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOutcome::Ok => "ok",
            SearchOutcome::NotFound => "not_found",
            SearchOutcome::ProviderError => "provider_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEvent {
    pub event: String,
    pub brand: String,
    pub model: String,
    pub outcome: SearchOutcome,
    pub track_title: Option<String>,
    pub track_artist: Option<String>,
}

impl SearchEvent {
    /// Describes how a recommend call for (brand, model) ended.
    pub fn from_result(
        brand: &str,
        model: &str,
        result: &Result<RecommendationRecord, RecommendError>,
    ) -> Self {
        let (outcome, track_title, track_artist) = match result {
            Ok(record) => (
                SearchOutcome::Ok,
                Some(record.title.clone()),
                Some(record.artist.clone()),
            ),
            Err(RecommendError::NotFound { .. }) => (SearchOutcome::NotFound, None, None),
            Err(RecommendError::Provider(_)) => (SearchOutcome::ProviderError, None, None),
        };
        SearchEvent {
            event: SEARCH_HEADPHONE_EVENT.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            outcome,
            track_title,
            track_artist,
        }
    }
}
