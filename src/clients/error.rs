use serde_json::Value;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced by the catalog client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed request or a response that does not have the expected shape.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport failure. Also used to wrap the last failure once retries run out.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The upstream is throttling us. Never retried.
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited { retry_after: Option<u64> },

    /// The request reached the upstream but the payload carries errors.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Upstream returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

impl ClientError {
    pub fn network(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Whether this failure means "slow down" rather than "try again".
    ///
    /// Matches the dedicated variant, a 429 status, or a message that
    /// mentions the limit, since wrapped upstream errors only keep their text.
    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Status { status: 429, .. } => true,
            other => mentions_rate_limit(&other.to_string()),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::RateLimited { .. } => "RATE_LIMIT_ERROR",
            Self::GraphQl(_) => "GRAPHQL_ERROR",
            Self::Status { .. } => "HTTP_ERROR",
        }
    }
}

#[must_use]
pub fn mentions_rate_limit(text: &str) -> bool {
    text.contains("429") || text.contains("Too Many Requests")
}

/// Detects throttling in any of the shapes the upstream uses: the HTTP
/// status, a GraphQL error entry with `status: 429`, or the message text.
#[must_use]
pub fn is_rate_limited(status: u16, body: Option<&Value>) -> bool {
    if status == 429 {
        return true;
    }

    let Some(errors) = body
        .and_then(|b| b.get("errors"))
        .and_then(Value::as_array)
    else {
        return false;
    };

    errors.iter().any(|e| {
        e.get("status").and_then(Value::as_u64) == Some(429)
            || e.get("message")
                .and_then(Value::as_str)
                .is_some_and(mentions_rate_limit)
    })
}

/// Joins the `message` of every GraphQL error entry.
#[must_use]
pub fn graphql_error_message(body: &Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }

    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect();

    if messages.is_empty() {
        Some("Unknown GraphQL error".to_string())
    } else {
        Some(messages.join("; "))
    }
}
