//! Local stand-ins for the Gemini and Spotify HTTP APIs
//!
//! Used to exercise the real provider clients end to end without network.

use super::constants::*;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Default)]
struct UpstreamState {
    /// Text Gemini answers with; `None` makes it return 503.
    gemini_reply: Mutex<Option<String>>,
    /// Song queries the catalog knows about.
    catalog: Mutex<Vec<String>>,
    gemini_calls: AtomicUsize,
    token_calls: AtomicUsize,
    search_queries: Mutex<Vec<String>>,
}

pub struct MockUpstream {
    pub base_url: String,
    state: Arc<UpstreamState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub async fn spawn() -> Self {
        let state = Arc::new(UpstreamState::default());
        let router = Router::new()
            .route("/models/{action}", post(generate_content))
            .route("/api/token", post(token))
            .route("/v1/search", get(search))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock upstream");
        let base_url = format!(
            "http://{}",
            listener.local_addr().expect("Failed to get local address")
        );

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock upstream failed");
        });

        Self {
            base_url,
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn set_gemini_reply(&self, reply: Option<String>) {
        *self.state.gemini_reply.lock().unwrap() = reply;
    }

    pub fn add_catalog_track(&self, song_query: &str) {
        self.state
            .catalog
            .lock()
            .unwrap()
            .push(song_query.to_string());
    }

    pub fn gemini_calls(&self) -> usize {
        self.state.gemini_calls.load(Ordering::SeqCst)
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.state.search_queries.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn generate_content(State(state): State<Arc<UpstreamState>>) -> Response {
    state.gemini_calls.fetch_add(1, Ordering::SeqCst);
    match state.gemini_reply.lock().unwrap().clone() {
        Some(text) => Json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        }))
        .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn token(State(state): State<Arc<UpstreamState>>, headers: HeaderMap) -> Response {
    state.token_calls.fetch_add(1, Ordering::SeqCst);
    if headers.get("authorization").is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"access_token": "mock-token", "token_type": "Bearer", "expires_in": 3600}))
        .into_response()
}

async fn search(
    State(state): State<Arc<UpstreamState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = params.get("q").cloned().unwrap_or_default();
    state.search_queries.lock().unwrap().push(query.clone());

    let known = state.catalog.lock().unwrap().contains(&query);
    let items = if known {
        json!([{
            "id": TRACK_ID,
            "name": TRACK_TITLE,
            "artists": [{"name": TRACK_ARTIST}],
            "album": {"images": [{"url": TRACK_COVER_URL}]},
            "preview_url": "https://p.scdn.co/mp3-preview/abc",
            "external_urls": {"spotify": TRACK_SPOTIFY_URL}
        }])
    } else {
        json!([])
    };
    Json(json!({"tracks": {"items": items}})).into_response()
}
