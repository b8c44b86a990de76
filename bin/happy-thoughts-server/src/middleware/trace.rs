use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ServerError;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies up to this size are logged verbatim.
const MAX_LOGGED_BODY: usize = 1024;

/// Request bodies are never buffered past this many bytes.
pub const MAX_REQUEST_BODY: usize = 16 * 1024;

/// Tag every request with a trace id and log it with status and latency.
///
/// A valid UUID in the incoming `x-trace-id` header is reused, otherwise a new
/// one is generated. The id is echoed on the response.
pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let trace_header = HeaderValue::from_str(&trace_id.to_string()).ok();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let (parts, body) = req.into_parts();
        let req_bytes = match read_request_body(body).await {
            Ok(bytes) => bytes,
            Err(err) => {
                let mut response = err.into_response();
                if let Some(value) = trace_header {
                    response.headers_mut().insert(X_TRACE_ID, value);
                }
                info!(
                    status = response.status().as_u16(),
                    latency_ms = start_time.elapsed().as_millis(),
                    "← response finished"
                );
                return response;
            }
        };
        log_body("request", &parts.headers, &req_bytes);
        let mut req = Request::from_parts(parts, Body::from(req_bytes));
        if let Some(value) = &trace_header {
            req.headers_mut().insert(X_TRACE_ID, value.clone());
        }

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();
        let res_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(error = %e, "failed to buffer response body");
                Bytes::new()
            }
        };
        log_body("response", &parts.headers, &res_bytes);
        let mut response = Response::from_parts(parts, Body::from(res_bytes));
        if let Some(value) = trace_header {
            response.headers_mut().insert(X_TRACE_ID, value);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );

        response
    }
    .instrument(span)
    .await
}

/// Collect a request body, giving up as soon as it grows past [`MAX_REQUEST_BODY`].
async fn read_request_body(body: Body) -> Result<Bytes, ServerError> {
    match Limited::new(body, MAX_REQUEST_BODY).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ServerError::BodyTooLarge(MAX_REQUEST_BODY))
        }
        Err(e) => {
            warn!(error = %e, "failed to buffer request body");
            Err(ServerError::MalformedBody(e.to_string()))
        }
    }
}

/// Log `bytes` verbatim when they are small JSON, otherwise just their size.
fn log_body(direction: &str, headers: &header::HeaderMap, bytes: &Bytes) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let is_json = content_type.contains("application/json");

    if is_json && bytes.len() < MAX_LOGGED_BODY {
        if let Ok(text) = std::str::from_utf8(bytes) {
            info!("{direction} body: {text}");
        }
    } else if !bytes.is_empty() {
        info!("{direction} body: [skipped: type={content_type}, size={}]", bytes.len());
    }
}
