//! `/graphql`: a validating pass-through to the upstream catalog.
//!
//! Bodies are forwarded untouched. Only the failure shapes are translated:
//! throttling becomes 429, an unreachable upstream becomes 503, and GraphQL
//! error payloads are relayed with the upstream status.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

use super::validation::validate_graphql_request;
use super::{ApiError, AppState};
use crate::clients::UpstreamReply;
use crate::clients::transport::DEFAULT_RETRY_AFTER_SECS;

pub async fn discovery() -> Json<Value> {
    Json(json!({
        "message": "GraphQL endpoint - use POST with query and variables",
        "endpoint": "/graphql",
        "methods": ["POST"],
    }))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn proxy(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::validation(format!("Request body is not valid JSON: {e}")))?;

    validate_graphql_request(&payload)?;

    let reply = state.upstream.send_raw(&payload).await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            ApiError::unavailable(e.to_string())
        } else {
            ApiError::internal(format!("GraphQL proxy request failed: {e}"))
        }
    })?;

    debug!(status = reply.status, "Upstream replied");
    relay(reply)
}

fn relay(reply: UpstreamReply) -> Result<Response, ApiError> {
    if reply.is_rate_limited() {
        return Err(ApiError::RateLimited {
            retry_after: reply.retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        });
    }

    let status = StatusCode::from_u16(reply.status)
        .map_err(|_| ApiError::internal(format!("Invalid upstream status {}", reply.status)))?;

    match reply.body {
        Some(body) if status.is_success() => Ok((status, Json(body)).into_response()),
        Some(body) if body.get("errors").is_some_and(Value::is_array) => {
            warn!(status = reply.status, "Relaying GraphQL error payload");
            Ok((status, Json(body)).into_response())
        }
        _ => Err(ApiError::internal(format!(
            "Unexpected upstream response with status {}",
            reply.status
        ))),
    }
}
