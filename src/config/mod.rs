use crate::utils::error::{HistoryError, HistoryResult};
use config::{Config as RawConfig, Environment, File, FileFormat};
use dotenv::dotenv;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Public endpoint of the Helius REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.helius.xyz/";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_unhealthy_after_n_errors() -> usize {
    3
}

fn human_readable_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let duration_str: String = Deserialize::deserialize(deserializer)?;
    humantime::parse_duration(&duration_str).map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Helius API key, attached to every request as a query parameter.
    #[serde(default)]
    pub api_key: String,
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "human_readable_duration"
    )]
    pub request_timeout: Duration,
    /// Page size requested from the history endpoint when the caller does
    /// not choose one.
    #[serde(default)]
    pub page_limit: Option<u32>,
    #[serde(default = "default_unhealthy_after_n_errors")]
    pub unhealthy_after_n_errors: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            request_timeout: default_request_timeout(),
            page_limit: None,
            unhealthy_after_n_errors: default_unhealthy_after_n_errors(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Loads the configuration from an optional TOML file and `APP`-prefixed
    /// environment variables (e.g. `APP__API__API_KEY`).
    pub fn new(config_path: Option<PathBuf>) -> HistoryResult<Self> {
        dotenv().ok();

        let mut builder = RawConfig::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

        let raw = builder
            .build()
            .map_err(|e| HistoryError::ConfigError(e.to_string()))?;
        let cfg: Config = raw
            .try_deserialize()
            .map_err(|e| HistoryError::ConfigError(e.to_string()))?;

        Ok(cfg)
    }

    pub fn validate(&self) -> HistoryResult<()> {
        if self.api.api_key.is_empty() {
            return Err(HistoryError::ConfigError(
                "api.api_key must be set".to_string(),
            ));
        }
        if Url::parse(&self.api.base_url).is_err() {
            return Err(HistoryError::ConfigError(
                "api.base_url must be a valid url".to_string(),
            ));
        }
        if self.api.request_timeout == Duration::from_secs(0) {
            return Err(HistoryError::ConfigError(
                "api.request_timeout must be greater than 0".to_string(),
            ));
        }
        if self.api.page_limit == Some(0) {
            return Err(HistoryError::ConfigError(
                "api.page_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
