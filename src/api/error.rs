use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use super::ApiResponse;
use crate::clients::ClientError;
use crate::clients::transport::DEFAULT_RETRY_AFTER_SECS;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    MethodNotAllowed,

    RateLimited { retry_after: u64 },

    ServiceUnavailable(String),

    ExternalApiError { service: String, message: String },

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::MethodNotAllowed => write!(f, "Method Not Allowed"),
            Self::RateLimited { retry_after } => {
                write!(f, "Rate limited, retry after {retry_after}s")
            }
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {msg}"),
            Self::ExternalApiError { service, message } => {
                write!(f, "{service} error: {message}")
            }
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed".to_string(),
            ),
            Self::RateLimited { retry_after } => {
                tracing::warn!(retry_after, "Upstream rate limit hit");
                return rate_limited_response(*retry_after);
            }
            Self::ServiceUnavailable(msg) => {
                tracing::warn!("Upstream unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "GraphQL API is temporarily unavailable".to_string(),
                )
            }
            Self::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{service} service returned an error"),
                )
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

fn rate_limited_response(retry_after: u64) -> Response {
    let body = json!({
        "success": false,
        "error": "Too Many Requests",
        "retryAfter": retry_after,
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::RateLimited { retry_after } => Self::RateLimited {
                retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            // Exhausted retries wrap the last failure; classify by that one.
            ClientError::Network { message, source } => {
                match source.map(|s| s.downcast::<ClientError>()) {
                    Some(Ok(inner)) => Self::from(*inner),
                    _ => Self::ServiceUnavailable(message),
                }
            }
            ClientError::Status { status: 404, .. } => Self::NotFound("Anime not found".to_string()),
            ClientError::GraphQl(ref msg) if msg.contains("Not Found") => {
                Self::NotFound("Anime not found".to_string())
            }
            other if other.is_rate_limit() => Self::RateLimited {
                retry_after: DEFAULT_RETRY_AFTER_SECS,
            },
            other => Self::anilist_error(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn anime_not_found(id: i32) -> Self {
        Self::NotFound(format!("Anime {id} not found"))
    }

    pub fn anilist_error(msg: impl Into<String>) -> Self {
        Self::ExternalApiError {
            service: "AniList".to_string(),
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}
