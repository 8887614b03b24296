mod config;
mod db;
mod dictionary;
mod game;
mod models;
mod profile;
mod routes;
mod session;
mod storage;
mod websocket;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use config::Config;
use dashmap::DashMap;
use dictionary::Dictionary;
use models::Portfolio;
use session::SessionInfo;
use storage::{KeyValueStore, MemoryStore, PgStore, StatsRepository};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub stats: StatsRepository,
    pub dictionary: Dictionary,
    pub portfolio: Portfolio,
    /// Open pages keyed by session id
    pub sessions: DashMap<Uuid, SessionInfo>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        dictionary: Dictionary,
        portfolio: Portfolio,
    ) -> Self {
        let stats = StatsRepository::new(store, config.game.stats_key.clone());
        Self {
            config,
            stats,
            dictionary,
            portfolio,
            sessions: DashMap::new(),
        }
    }

    /// State backed by an in-memory store and the built-in content
    pub fn in_memory(config: Config) -> Arc<Self> {
        Arc::new(Self::new(
            config,
            Arc::new(MemoryStore::new()),
            Dictionary::builtin(),
            Portfolio::empty(),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting portfolio backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Pick the statistics store
    let store: Arc<dyn KeyValueStore> = match config.database.url.as_deref() {
        Some(url) => {
            let pool = db::connect(url, config.database.max_connections).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; word game statistics are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    // Load page content
    let portfolio = match Portfolio::load(&config.server.portfolio_path).await {
        Ok(portfolio) => portfolio,
        Err(e) => {
            tracing::warn!("Failed to load portfolio content: {:#}. Serving an empty page.", e);
            tracing::warn!(
                "Write portfolio content to {} to fill the page sections",
                config.server.portfolio_path
            );
            Portfolio::empty()
        }
    };

    let state = Arc::new(AppState::new(
        config.clone(),
        store,
        Dictionary::builtin(),
        portfolio,
    ));

    let app = build_app(state, &config.server.frontend_dir);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Portfolio page: http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_app(state: Arc<AppState>, frontend_dir: &str) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Page markup, images and the resume are plain static files
    let frontend_service = ServeDir::new(frontend_dir);

    Router::new()
        .merge(routes::create_routes())
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_static_path_is_not_found() {
        let app = build_app(AppState::in_memory(Config::default()), "/nonexistent-frontend");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/resume.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_routes_mounted() {
        let app = build_app(AppState::in_memory(Config::default()), "/nonexistent-frontend");
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_in_memory_state_uses_configured_stats_key() {
        let mut config = Config::default();
        config.game.stats_key = "customKey".to_string();
        let state = AppState::in_memory(config);
        assert_eq!(state.stats.key_for("p"), "customKey:p");
        assert_eq!(state.dictionary.len(), 40);
    }
}
