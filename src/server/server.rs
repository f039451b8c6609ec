use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{info, warn};

use crate::history::{SearchEvent, SearchLog};
use crate::recommendation::{RecommendError, RecommendationOrchestrator};

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
    pub cache: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct RecommendBody {
    pub brand: String,
    pub model: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for RecommendError {
    fn into_response(self) -> Response {
        let status = match &self {
            RecommendError::NotFound { .. } => StatusCode::NOT_FOUND,
            RecommendError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: state.version.clone(),
        cache: state.orchestrator.cache_name().to_string(),
    };
    Json(stats)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn record_search(search_log: GuardedSearchLog, event: SearchEvent) {
    let result = tokio::task::spawn_blocking(move || search_log.record(&event)).await;
    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!("Failed to record search event: {:#}", err),
        Err(err) => warn!("Search event task failed: {}", err),
    }
}

async fn recommend(
    State(orchestrator): State<GuardedOrchestrator>,
    State(search_log): State<GuardedSearchLog>,
    Json(body): Json<RecommendBody>,
) -> Response {
    let result = orchestrator.recommend(&body.brand, &body.model).await;
    record_search(
        search_log,
        SearchEvent::from_result(&body.brand, &body.model, &result),
    )
    .await;

    match result {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_app(
    config: ServerConfig,
    orchestrator: Arc<RecommendationOrchestrator>,
    search_log: Arc<dyn SearchLog>,
) -> Result<Router> {
    let enable_cors = config.enable_cors;
    let state = ServerState::new(config, orchestrator, search_log);

    let app: Router = Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/recommend", post(recommend))
        .route("/v1/recommend", post(recommend))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, log_requests));

    if enable_cors {
        return Ok(app.layer(CorsLayer::permissive()));
    }
    Ok(app)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections..."),
        Err(err) => warn!("Could not listen for shutdown signal: {}", err),
    }
}

pub async fn run_server(
    config: ServerConfig,
    orchestrator: Arc<RecommendationOrchestrator>,
    search_log: Arc<dyn SearchLog>,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, orchestrator, search_log)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
