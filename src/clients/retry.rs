use std::future::Future;
use std::time::Duration;
use tracing::debug;

use super::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOptions {
    pub max_retries: u32,
    pub delay: Duration,
    pub exponential_backoff: bool,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(1000),
            exponential_backoff: true,
        }
    }
}

impl RetryOptions {
    /// Wait before the attempt following `attempt` (zero-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.exponential_backoff {
            self.delay.saturating_mul(2u32.saturating_pow(attempt))
        } else {
            self.delay
        }
    }
}

/// Runs `op` until it succeeds or `max_retries` attempts have failed.
///
/// A rate-limit failure stops immediately with [`ClientError::RateLimited`];
/// hammering a throttled upstream only extends the throttle. Once attempts
/// run out the last failure is returned wrapped in a network error.
pub async fn with_retry<T, F, Fut>(options: &RetryOptions, mut op: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let attempts = options.max_retries.max(1);
    let mut last_error = None;

    for attempt in 0..attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_rate_limit() => {
                let retry_after = match err {
                    ClientError::RateLimited { retry_after } => retry_after,
                    _ => None,
                };
                return Err(ClientError::RateLimited { retry_after });
            }
            Err(err) => {
                if attempt + 1 < attempts {
                    let wait = options.delay_for(attempt);
                    debug!(
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        delay_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
                last_error = Some(err);
            }
        }
    }

    Err(ClientError::Network {
        message: format!("Failed after {attempts} attempts"),
        source: last_error.map(|e| Box::new(e) as super::error::BoxError),
    })
}
