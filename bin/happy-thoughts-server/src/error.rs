//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted to
//! a `{ "message": …, "error": … }` JSON body with a deliberate status code.
//!
//! Store failures are logged with full detail but only a generic message is
//! returned, so connection strings or SQL never leak to clients.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::db::StoreError;
use crate::schemas::thought::ErrorResponse;

const SAVE_FAILED: &str = "Could not save the thought to the database";
const NOT_FOUND: &str = "Thought was not found";

/// All errors that can occur in the request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The message failed the presence or length check.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The body was not valid JSON for the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The request body exceeded the configured limit.
    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    /// No thought matches the given id.
    #[error("thought {0} not found")]
    ThoughtNotFound(String),

    /// Propagated from the active store backend.
    #[error("database error: {0}")]
    Database(#[from] StoreError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            ServerError::Validation(errors) => {
                let detail = serde_json::to_value(errors).unwrap_or(Value::Null);
                (StatusCode::BAD_REQUEST, SAVE_FAILED, detail)
            }
            ServerError::MalformedBody(m) => (StatusCode::BAD_REQUEST, SAVE_FAILED, json!(m)),
            ServerError::BodyTooLarge(limit) => {
                warn!(limit, "request body too large");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    SAVE_FAILED,
                    json!(format!("request body exceeds {limit} bytes")),
                )
            }
            // Kept at 400 rather than 404: clients of this API already branch on it.
            ServerError::ThoughtNotFound(id) => {
                warn!(id = %id, "like target not found");
                (
                    StatusCode::BAD_REQUEST,
                    NOT_FOUND,
                    json!(format!("no thought with id {id}")),
                )
            }
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error", Value::Null)
            }
        };
        let body = ErrorResponse { message: message.to_owned(), error: detail };
        (status, Json(body)).into_response()
    }
}

/// JSON body extractor whose rejections use the [`ServerError`] body shape.
///
/// axum's own [`Json`] answers malformed bodies with 415/422 and a plain-text
/// body; this API answers every bad body with 400 and `{ message, error }`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::MalformedBody(rejection.body_text())
    }
}
