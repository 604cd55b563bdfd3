use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::clients::transport::build_http_client;
use crate::clients::{AnilistClient, HttpTransport};
use crate::config::Config;
use crate::services::MediaCatalog;

mod anime;
mod browse;
mod error;
mod graphql;
mod observability;
mod types;
mod validation;

pub use error::ApiError;
pub use observability::REQUEST_ID_HEADER;
pub use types::*;

pub struct AppState {
    pub config: Config,

    /// Cached, retrying client behind the browse API.
    pub client: Arc<AnilistClient>,

    /// Raw pass-through used by `/graphql`.
    pub upstream: HttpTransport,


    pub prometheus_handle: Option<PrometheusHandle>,

    reference_date: Option<NaiveDate>,
}

impl AppState {
    /// State whose proxy forwards to `config.anilist.api_url`.
    pub fn new(
        config: Config,
        client: Arc<AnilistClient>,
        prometheus_handle: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        let http = build_http_client(
            Duration::from_secs(config.anilist.request_timeout_seconds),
            &config.anilist.user_agent,
        )?;
        let upstream = HttpTransport::new(http, config.anilist.api_url.clone());

        Ok(Self {
            config,
            client,
            upstream,
            prometheus_handle,
            reference_date: None,
        })
    }

    /// Pins the date used for season defaults.
    #[must_use]
    pub const fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<dyn MediaCatalog> {
        self.client.clone()
    }
}

pub fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let client = Arc::new(AnilistClient::from_config(&config)?);
    Ok(Arc::new(AppState::new(config, client, prometheus_handle)?))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();
    let inactivity = state.config.server.session_inactivity_minutes;

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(inactivity)));

    let browse_routes = Router::new()
        .route("/browse", get(browse::get_browse))
        .route("/browse/more", post(browse::load_more))
        .route(
            "/browse/filters",
            axum::routing::put(browse::update_filters).delete(browse::clear_filters),
        )
        .route("/browse/reset", post(browse::reset))
        .layer(session_layer);

    let api_router = Router::new()
        .merge(browse_routes)
        .route("/anime/trending", get(anime::get_trending))
        .route("/anime/search", get(anime::search_anime))
        .route("/anime/seasonal", get(anime::get_seasonal))
        .route("/anime/{id}", get(anime::get_anime))
        .route(
            "/cache",
            get(anime::get_cache_stats).delete(anime::invalidate_cache),
        )
        .route("/config/images", get(anime::get_image_config));

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route(
            "/graphql",
            get(graphql::discovery)
                .post(graphql::proxy)
                .fallback(graphql::method_not_allowed),
        )
        .nest("/api", api_router)
        .route("/metrics", get(observability::get_metrics))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state)
}
