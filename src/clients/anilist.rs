use serde_json::{Value, json};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::cache::{CachePattern, DEFAULT_TTL, TtlCache};
use super::error::{ClientError, graphql_error_message};
use super::queries;
use super::retry::{RetryOptions, with_retry};
use super::transport::{GraphqlTransport, HttpTransport, build_http_client};
use crate::config::Config;
use crate::models::{AnimeListParams, Media, MediaSeason, Page};

#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    pub enable_cache: bool,
    pub cache_ttl: Duration,
    pub enable_retry: bool,
    pub retry: RetryOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            enable_cache: true,
            cache_ttl: DEFAULT_TTL,
            enable_retry: true,
            retry: RetryOptions::default(),
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            enable_cache: config.cache.enabled,
            cache_ttl: Duration::from_secs(config.cache.ttl_seconds),
            enable_retry: config.retry.enabled,
            retry: RetryOptions {
                max_retries: config.retry.max_retries,
                delay: Duration::from_millis(config.retry.delay_ms),
                exponential_backoff: config.retry.exponential_backoff,
            },
        }
    }
}

/// Client for the anime catalog with response caching and retry.
///
/// Responses are cached by query prefix and sorted variables, so the same
/// page requested twice within the ttl costs one round trip.
pub struct AnilistClient {
    transport: Arc<dyn GraphqlTransport>,
    cache: Mutex<TtlCache<Value>>,
    options: ClientOptions,
}

impl std::fmt::Debug for AnilistClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnilistClient")
            .field("options", &self.options)
            .field("cached_entries", &self.cache_size())
            .finish_non_exhaustive()
    }
}

fn cache_key(query: &str, variables: &Value) -> String {
    // serde_json keeps object keys sorted, so equal variables render equally.
    let prefix: String = query.trim_start().chars().take(50).collect();
    format!("{prefix}:{variables}")
}

fn query_preview(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(100)
        .collect()
}

impl AnilistClient {
    #[must_use]
    pub fn new(transport: Arc<dyn GraphqlTransport>, options: ClientOptions) -> Self {
        Self {
            transport,
            cache: Mutex::new(TtlCache::new()),
            options,
        }
    }

    /// Client posting to `anilist.endpoint` when set, else straight to the
    /// upstream catalog URL.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = build_http_client(
            Duration::from_secs(config.anilist.request_timeout_seconds),
            &config.anilist.user_agent,
        )?;
        let transport = HttpTransport::new(http, config.anilist.client_endpoint());
        Ok(Self::new(
            Arc::new(transport),
            ClientOptions::from_config(config),
        ))
    }

    fn cache(&self) -> MutexGuard<'_, TtlCache<Value>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn fetch(&self, body: &Value, context: &str) -> Result<Value, ClientError> {
        let mut response = self.transport.post(body).await.inspect_err(|e| {
            debug!(context, error = %e, "Catalog request failed");
        })?;

        match response.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(graphql_error_message(&response).map_or_else(
                || ClientError::Validation("No data returned from GraphQL query".to_string()),
                |msg| ClientError::GraphQl(format!("{context}: {msg}")),
            )),
        }
    }

    /// Runs `query` and returns the `data` member of the response.
    pub async fn execute(
        &self,
        query: &str,
        variables: Value,
        context: &str,
    ) -> Result<Value, ClientError> {
        let key = cache_key(query, &variables);

        if self.options.enable_cache {
            let hit = self.cache().get(&key);
            if let Some(hit) = hit {
                debug!(key = %key, "Catalog cache hit");
                metrics::counter!("anilist_cache_hits_total").increment(1);
                return Ok(hit);
            }
        }

        let body = json!({ "query": query, "variables": variables });
        debug!(query = %query_preview(query), variables = %body["variables"], "Catalog request");

        let start = Instant::now();
        let result = if self.options.enable_retry {
            with_retry(&self.options.retry, || self.fetch(&body, context)).await
        } else {
            self.fetch(&body, context).await
        };

        match result {
            Ok(data) => {
                debug!(
                    duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Catalog response"
                );
                if self.options.enable_cache {
                    self.cache().set(key, data.clone(), self.options.cache_ttl);
                }
                Ok(data)
            }
            Err(e) => {
                warn!(context, error = %e, "Catalog request gave up");
                Err(e)
            }
        }
    }

    async fn execute_page(
        &self,
        query: &str,
        variables: Value,
        context: &str,
    ) -> Result<Page, ClientError> {
        let mut data = self.execute(query, variables, context).await?;
        extract_page(data.get_mut("Page").map(Value::take))
    }

    pub async fn get_anime_list(&self, params: &AnimeListParams) -> Result<Page, ClientError> {
        self.execute_page(
            queries::GET_ANIME_LIST,
            params.to_variables(),
            "Failed to fetch anime list",
        )
        .await
    }

    pub async fn get_anime_details(&self, id: i32) -> Result<Media, ClientError> {
        let mut data = self
            .execute(
                queries::GET_ANIME_DETAILS,
                json!({ "id": id }),
                "Failed to fetch anime details",
            )
            .await?;
        extract_media(data.get_mut("Media").map(Value::take))
    }

    pub async fn search_anime(
        &self,
        search: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page, ClientError> {
        self.execute_page(
            queries::SEARCH_ANIME,
            json!({ "search": search, "page": page, "perPage": per_page }),
            "Failed to search anime",
        )
        .await
    }

    pub async fn get_trending_anime(&self, page: u32, per_page: u32) -> Result<Page, ClientError> {
        self.execute_page(
            queries::GET_TRENDING_ANIME,
            json!({ "page": page, "perPage": per_page }),
            "Failed to fetch trending anime",
        )
        .await
    }

    pub async fn get_seasonal_anime(
        &self,
        season: MediaSeason,
        season_year: i32,
        page: u32,
        per_page: u32,
    ) -> Result<Page, ClientError> {
        self.execute_page(
            queries::GET_SEASONAL_ANIME,
            json!({
                "season": season,
                "seasonYear": season_year,
                "page": page,
                "perPage": per_page,
            }),
            "Failed to fetch seasonal anime",
        )
        .await
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    pub fn invalidate_cache(&self, pattern: impl Into<CachePattern>) -> usize {
        self.cache().invalidate(pattern)
    }

    #[must_use]
    pub fn cache_size(&self) -> usize {
        self.cache().size()
    }

    #[must_use]
    pub fn cache_keys(&self) -> Vec<String> {
        self.cache().keys()
    }
}

fn extract_page(data: Option<Value>) -> Result<Page, ClientError> {
    let Some(page) = data.filter(|v| !v.is_null()) else {
        return Err(ClientError::Validation(
            "No data received from API".to_string(),
        ));
    };

    serde_json::from_value(page).map_err(|e| {
        ClientError::Validation(format!("Invalid API response structure for Page: {e}"))
    })
}

fn extract_media(data: Option<Value>) -> Result<Media, ClientError> {
    let Some(media) = data.filter(|v| !v.is_null()) else {
        return Err(ClientError::Validation(
            "No anime data received from API".to_string(),
        ));
    };

    serde_json::from_value(media).map_err(|e| {
        ClientError::Validation(format!("Invalid API response structure for Media: {e}"))
    })
}
