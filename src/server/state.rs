use axum::extract::FromRef;

use crate::history::SearchLog;
use crate::recommendation::RecommendationOrchestrator;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedOrchestrator = Arc<RecommendationOrchestrator>;
pub type GuardedSearchLog = Arc<dyn SearchLog>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub orchestrator: GuardedOrchestrator,
    pub search_log: GuardedSearchLog,
    pub version: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        orchestrator: GuardedOrchestrator,
        search_log: GuardedSearchLog,
    ) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            orchestrator,
            search_log,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl FromRef<ServerState> for GuardedOrchestrator {
    fn from_ref(input: &ServerState) -> Self {
        input.orchestrator.clone()
    }
}

impl FromRef<ServerState> for GuardedSearchLog {
    fn from_ref(input: &ServerState) -> Self {
        input.search_log.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
