//! `/thoughts` endpoints: list the newest thoughts, create one, like one.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;

use crate::entities::{NewThought, ThoughtStore, RECENT_THOUGHTS_LIMIT};
use crate::error::{JsonBody, ServerError};
use crate::schemas::thought::{CreateThoughtRequest, ErrorResponse, LikeResponse, ThoughtResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_thoughts, create_thought, like_thought),
    components(schemas(CreateThoughtRequest, ThoughtResponse, LikeResponse, ErrorResponse))
)]
pub struct ThoughtsApi;

/// Register thought routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/thoughts", get(list_thoughts).post(create_thought))
        .route("/thoughts/{id}/like", post(like_thought))
}

#[utoipa::path(
    get,
    path = "/thoughts",
    tag = "thoughts",
    responses(
        (status = 200, description = "Up to 20 thoughts, newest first", body = [ThoughtResponse]),
        (status = 500, description = "Store error", body = ErrorResponse),
    )
)]
pub async fn list_thoughts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ThoughtResponse>>, ServerError> {
    let thoughts = state.store.list_recent_thoughts(RECENT_THOUGHTS_LIMIT).await?;
    Ok(Json(thoughts.iter().map(|t| t.to_response()).collect()))
}

#[utoipa::path(
    post,
    path = "/thoughts",
    tag = "thoughts",
    request_body = CreateThoughtRequest,
    responses(
        (status = 201, description = "Thought created", body = ThoughtResponse),
        (status = 400, description = "Invalid message or body", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse),
    )
)]
pub async fn create_thought(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateThoughtRequest>,
) -> Result<(StatusCode, Json<ThoughtResponse>), ServerError> {
    let thought = NewThought::try_from(req)?;
    let record = state.store.insert_thought(thought).await?;
    info!(id = %record.id, "thought created");
    Ok((StatusCode::CREATED, Json(record.to_response())))
}

#[utoipa::path(
    post,
    path = "/thoughts/{id}/like",
    tag = "thoughts",
    params(
        ("id" = String, Path, description = "ID of the thought to like")
    ),
    responses(
        (status = 200, description = "Heart added", body = LikeResponse),
        (status = 400, description = "Thought not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse),
    )
)]
pub async fn like_thought(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ServerError> {
    let ack = state.store.add_heart(&id).await?;
    if !ack.is_matched() {
        return Err(ServerError::ThoughtNotFound(id));
    }
    Ok(Json(ack.to_response()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::db::Store;
    use crate::routes;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{DateTime, SubsecRound, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_state() -> Arc<AppState> {
        let store = Store::connect("sqlite::memory:").await.unwrap();
        Arc::new(AppState::new(Config::default(), store))
    }

    async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
        let response = routes::build(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn create(state: &Arc<AppState>, message: &str) -> Value {
        let (status, body) = send(state, post_json("/thoughts", json!({ "message": message }))).await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn create_returns_201_with_the_stored_record() {
        let state = test_state().await;
        let before = Utc::now().trunc_subsecs(3);

        let body = create(&state, "Hello world").await;

        assert_eq!(body["message"], "Hello world");
        assert_eq!(body["hearts"], 0);
        assert_eq!(body["_id"].as_str().unwrap().len(), 24);
        let created_at: DateTime<Utc> = body["createdAt"].as_str().unwrap().parse().unwrap();
        assert!(created_at >= before);

        let stored = state
            .store
            .get_thought(body["_id"].as_str().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.hearts, 0);
    }

    #[tokio::test]
    async fn short_message_is_rejected_and_not_persisted() {
        let state = test_state().await;

        let (status, body) = send(&state, post_json("/thoughts", json!({ "message": "Hi" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Could not save the thought to the database");
        assert!(body["error"]["message"].is_array());
        assert!(state.store.list_recent_thoughts(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn long_or_missing_messages_are_rejected() {
        let state = test_state().await;
        let too_long = "a".repeat(141);

        for payload in [json!({ "message": too_long }), json!({}), json!({ "message": null })] {
            let (status, body) = send(&state, post_json("/thoughts", payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].is_object());
        }
        assert!(state.store.list_recent_thoughts(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_bodies_get_the_same_error_shape() {
        let state = test_state().await;

        let not_json = Request::builder()
            .method("POST")
            .uri("/thoughts")
            .header("Content-Type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let (status, body) = send(&state, not_json).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(&state, post_json("/thoughts", json!({ "message": 12345 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&state, post_empty("/thoughts")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_is_capped_at_twenty_and_newest_first() {
        let state = test_state().await;
        for n in 0..23 {
            create(&state, &format!("happy thought {n}")).await;
        }

        let (status, body) = send(&state, get("/thoughts")).await;
        assert_eq!(status, StatusCode::OK);

        let thoughts = body.as_array().unwrap();
        assert_eq!(thoughts.len(), 20);
        assert_eq!(thoughts[0]["message"], "happy thought 22");

        let timestamps: Vec<DateTime<Utc>> = thoughts
            .iter()
            .map(|t| t["createdAt"].as_str().unwrap().parse().unwrap())
            .collect();
        assert!(timestamps.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn two_likes_yield_two_hearts() {
        let state = test_state().await;
        let created = create(&state, "Like me twice").await;
        let id = created["_id"].as_str().unwrap();
        let uri = format!("/thoughts/{id}/like");

        let (status, first) = send(&state, post_empty(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["acknowledged"], true);
        assert_eq!(first["matchedCount"], 1);
        assert_eq!(first["modifiedCount"], 1);

        let (status, _) = send(&state, post_empty(&uri)).await;
        assert_eq!(status, StatusCode::OK);

        let stored = state.store.get_thought(id).await.unwrap().unwrap();
        assert_eq!(stored.hearts, 2);

        let (_, listed) = send(&state, get("/thoughts")).await;
        assert_eq!(listed[0]["hearts"], 2);
    }

    #[tokio::test]
    async fn liking_an_unknown_id_is_400_and_changes_nothing() {
        let state = test_state().await;
        let created = create(&state, "Lonely thought").await;

        for id in ["64b7f0c2a1b2c3d4e5f60718", "not-an-object-id"] {
            let (status, body) = send(&state, post_empty(&format!("/thoughts/{id}/like"))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Thought was not found");
        }

        let stored = state
            .store
            .get_thought(created["_id"].as_str().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.hearts, 0);
    }
}
