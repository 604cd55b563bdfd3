use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::error::{ClientError, graphql_error_message, is_rate_limited, mentions_rate_limit};

/// Fallback wait when a throttled response carries no `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Sends one GraphQL request body and returns the decoded response body.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn post(&self, body: &Value) -> Result<Value, ClientError>;
}

/// Raw outcome of one upstream exchange, before any interpretation.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: u16,
    pub retry_after: Option<u64>,
    /// `None` when the body was not JSON.
    pub body: Option<Value>,
    /// Raw body text, kept only when it did not decode as JSON.
    pub text: Option<String>,
}

impl UpstreamReply {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        is_rate_limited(self.status, self.body.as_ref())
            || self.text.as_deref().is_some_and(mentions_rate_limit)
    }
}

/// Build an HTTP client for catalog calls. Shared by the proxy and the API
/// client so both pool connections to the same host.
pub fn build_http_client(timeout: Duration, user_agent: &str) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `body` verbatim and captures status, `Retry-After` and JSON body.
    pub async fn send_raw(&self, body: &Value) -> Result<UpstreamReply, reqwest::Error> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse().ok());

        let bytes = response.bytes().await?;
        let body: Option<Value> = serde_json::from_slice(&bytes).ok();
        let text = body
            .is_none()
            .then(|| String::from_utf8_lossy(&bytes).into_owned());

        Ok(UpstreamReply {
            status,
            retry_after,
            body,
            text,
        })
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn post(&self, body: &Value) -> Result<Value, ClientError> {
        let reply = self.send_raw(body).await.map_err(|e| {
            let message = if e.is_timeout() {
                "Request to catalog timed out"
            } else if e.is_connect() {
                "Could not reach catalog"
            } else {
                "Network request to catalog failed"
            };
            ClientError::network(message, e)
        })?;

        if reply.is_rate_limited() {
            return Err(ClientError::RateLimited {
                retry_after: reply.retry_after.or(Some(DEFAULT_RETRY_AFTER_SECS)),
            });
        }

        match reply.body {
            Some(body) if reply.is_success() => Ok(body),
            Some(body) => Err(graphql_error_message(&body).map_or_else(
                || ClientError::Status {
                    status: reply.status,
                    message: body.to_string(),
                },
                ClientError::GraphQl,
            )),
            None => Err(ClientError::Status {
                status: reply.status,
                message: "Response body is not JSON".to_string(),
            }),
        }
    }
}
