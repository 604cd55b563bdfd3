use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding `anilist.api_url`.
pub const ANILIST_API_URL_ENV: &str = "ANILIST_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub anilist: AnilistConfig,

    pub cache: CacheConfig,

    pub retry: RetryConfig,

    pub browse: BrowseConfig,

    pub images: ImageConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// `pretty` or `json`
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Browse sessions expire after this much inactivity.
    pub session_inactivity_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            session_inactivity_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnilistConfig {
    /// Upstream GraphQL catalog the proxy forwards to.
    pub api_url: String,

    /// Where the API client posts queries. Unset means straight to `api_url`;
    /// point it at a running proxy (`http://host:port/graphql`) to go through it.
    pub endpoint: Option<String>,

    pub request_timeout_seconds: u64,

    pub user_agent: String,
}

impl Default for AnilistConfig {
    fn default() -> Self {
        Self {
            api_url: "https://graphql.anilist.co".to_string(),
            endpoint: None,
            request_timeout_seconds: 30,
            user_agent: "AniChart/1.0".to_string(),
        }
    }
}

impl AnilistConfig {
    #[must_use]
    pub fn client_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(&self.api_url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub enabled: bool,

    pub max_retries: u32,

    pub delay_ms: u64,

    pub exponential_backoff: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            delay_ms: 1000,
            exponential_backoff: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    pub items_per_page: u32,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self { items_per_page: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePreset {
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub fit: String,
}

impl ImagePreset {
    fn cover(width: u32, height: u32) -> Self {
        Self {
            format: "webp".to_string(),
            width,
            height,
            fit: "cover".to_string(),
        }
    }
}

/// Static settings for whatever renders catalog artwork. Served as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub domains: Vec<String>,

    pub formats: Vec<String>,

    pub presets: HashMap<String, ImagePreset>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        let mut presets = HashMap::new();
        presets.insert("avatar".to_string(), ImagePreset::cover(150, 150));
        presets.insert("cover".to_string(), ImagePreset::cover(600, 900));
        presets.insert("banner".to_string(), ImagePreset::cover(1200, 400));

        Self {
            domains: vec![
                "anilist.co".to_string(),
                "s4.anilist.co".to_string(),
                "cdn.myanimelist.net".to_string(),
            ],
            formats: ["webp", "avif", "png", "jpg"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            presets,
        }
    }
}

impl ImageConfig {
    /// Whether `image_url` is served from an allowlisted host.
    #[must_use]
    pub fn is_allowed(&self, image_url: &str) -> bool {
        let Ok(parsed) = url::Url::parse(image_url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.domains.iter().any(|d| d == host)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        // A missing .env file is normal.
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ANILIST_API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.anilist.api_url = url.trim().to_string();
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("anichart").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".anichart").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.anilist.api_url)
            .with_context(|| format!("Invalid AniList API URL: '{}'", self.anilist.api_url))?;

        if let Some(endpoint) = self.anilist.endpoint.as_deref().filter(|e| !e.is_empty()) {
            url::Url::parse(endpoint)
                .with_context(|| format!("Invalid AniList client endpoint: '{endpoint}'"))?;
        }

        if self.browse.items_per_page == 0 {
            anyhow::bail!("browse.items_per_page must be > 0");
        }

        if self.retry.enabled && self.retry.max_retries == 0 {
            anyhow::bail!("retry.max_retries must be > 0 when retry is enabled");
        }

        Ok(())
    }
}
