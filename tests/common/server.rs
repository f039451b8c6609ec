//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own in-memory cache and
//! search history database.

use super::constants::*;
use super::fixtures::{StubResolver, StubSynthesizer};
use audiophile_proof_server::cache::InMemoryRecommendationCache;
use audiophile_proof_server::history::SqliteSearchLog;
use audiophile_proof_server::recommendation::RecommendationOrchestrator;
use audiophile_proof_server::resolver::TrackResolver;
use audiophile_proof_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use audiophile_proof_server::synthesizer::SpecSynthesizer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Cache shared with the orchestrator, for direct inspection
    pub cache: Arc<InMemoryRecommendationCache>,

    /// SQLite file the server records searches into
    pub history_db_path: PathBuf,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl TestServer {
    /// Spawns a server backed by fresh stubs.
    pub async fn spawn() -> Self {
        Self::spawn_with(StubSynthesizer::new(), StubResolver::new()).await
    }

    /// Spawns a server on a random port using the given pipeline collaborators.
    ///
    /// # Panics
    ///
    /// Panics if the history database cannot be created, the port cannot be
    /// bound, or the server doesn't become ready within timeout.
    pub async fn spawn_with(
        synthesizer: Arc<dyn SpecSynthesizer>,
        resolver: Arc<dyn TrackResolver>,
    ) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let history_db_path = temp_db_dir.path().join("history.db");
        let search_log =
            Arc::new(SqliteSearchLog::new(&history_db_path).expect("Failed to open search log"));

        let cache = Arc::new(InMemoryRecommendationCache::default());
        let orchestrator = Arc::new(RecommendationOrchestrator::new(
            cache.clone(),
            synthesizer,
            resolver,
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            enable_cors: true,
        };
        let app = make_app(config, orchestrator, search_log).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            cache,
            history_db_path,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Outcomes recorded in the search history, oldest first.
    pub fn recorded_outcomes(&self) -> Vec<(String, String, String)> {
        let conn = rusqlite::Connection::open(&self.history_db_path)
            .expect("Failed to open history database");
        let mut stmt = conn
            .prepare("SELECT brand, model, outcome FROM search_events ORDER BY id")
            .expect("Failed to prepare history query");
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .expect("Failed to query history")
            .collect::<Result<_, _>>()
            .expect("Failed to read history rows");
        rows
    }

    /// Waits for the server to become ready by polling the /health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
