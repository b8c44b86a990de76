//! Greeting and heartbeat endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::state::AppState;

pub const GREETING: &str = "Hello happy thoughts";

#[derive(OpenApi)]
#[openapi(paths(get_root, get_health))]
pub struct HealthApi;

/// Register greeting and health-check routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_root))
        .route("/health", get(get_health))
}

/// Plain-text greeting.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Greeting", body = String, content_type = "text/plain")
    )
)]
pub async fn get_root() -> &'static str {
    GREETING
}

/// Heartbeat endpoint.
///
/// Returns `{"status": "ok", "version": "...", "store": "..."}` with HTTP 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is healthy", body = Value)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status":  "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "store":   state.store.backend(),
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::db::Store;

    #[tokio::test]
    async fn root_returns_the_greeting() {
        assert_eq!(get_root().await, "Hello happy thoughts");
    }

    #[tokio::test]
    async fn health_response_has_ok_status_and_version() {
        let store = Store::connect("sqlite::memory:").await.unwrap();
        let state = Arc::new(AppState::new(Config::default(), store));

        let Json(body) = get_health(State(state)).await;
        assert_eq!(body["status"], "ok");
        assert!(!body["version"].as_str().unwrap_or("").is_empty());
        assert_eq!(body["store"], "sqlite");
    }
}
