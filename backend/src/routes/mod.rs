pub mod health;
pub mod portfolio;
pub mod stats;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{websocket, AppState};

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ws", get(websocket::handle_websocket))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio", get(portfolio::get_portfolio))
        .route("/stats/{profile}", get(stats::get_stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, models::Statistics};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn app(state: Arc<AppState>) -> Router {
        create_routes().with_state(state)
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let (status, body) = get_json(app(AppState::in_memory(Config::default())), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn test_portfolio_served() {
        let (status, body) =
            get_json(app(AppState::in_memory(Config::default())), "/api/portfolio").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["sections"].is_array());
        assert!(body["skill_bars"].as_array().unwrap().len() == 6);
    }

    #[tokio::test]
    async fn test_stats_for_profile() {
        let state = AppState::in_memory(Config::default());
        let mut stats = Statistics::default();
        stats.record_win(1);
        stats.record_loss();
        state.stats.save("abc", &stats).await.unwrap();

        let (status, body) = get_json(app(state.clone()), "/api/stats/abc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["played"], 2);
        assert_eq!(body["winPercentage"], 50);

        let (status, _) = get_json(app(state), "/api/stats/not%20valid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
