use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_REGISTRY_URL: &str = "https://organic.ams.usda.gov/integrity/api/search";

/// HTTP and collaborator settings shared by the catalog and registry clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Connection timeout in seconds
    pub connect_timeout_seconds: u32,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u32,
    /// Bounded wait for the whole registry lookup, in seconds
    pub registry_wait_seconds: u32,
    /// User agent sent with every request
    pub user_agent: Option<String>,
    /// Base URL of the product catalog
    pub catalog_base_url: String,
    /// Search endpoint of the organic registry
    pub registry_url: String,
    /// Registry API key; lookups are skipped without one
    #[serde(skip_serializing)]
    pub registry_api_key: Option<String>,
    /// Maximum registry results fetched per search term
    pub registry_result_limit: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 5,
            request_timeout_seconds: 10,
            registry_wait_seconds: 5,
            user_agent: None,
            catalog_base_url: DEFAULT_CATALOG_URL.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            registry_api_key: None,
            registry_result_limit: 10,
        }
    }
}

impl NetworkConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("INGRID_CONNECT_TIMEOUT") {
            config.connect_timeout_seconds = parse_seconds("INGRID_CONNECT_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("INGRID_REQUEST_TIMEOUT") {
            config.request_timeout_seconds = parse_seconds("INGRID_REQUEST_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("INGRID_REGISTRY_WAIT") {
            config.registry_wait_seconds = parse_seconds("INGRID_REGISTRY_WAIT", &v)?;
        }
        if let Some(v) = lookup("INGRID_USER_AGENT") {
            config.user_agent = Some(v);
        }
        if let Some(v) = lookup("INGRID_CATALOG_URL") {
            config.catalog_base_url = v;
        }
        if let Some(v) = lookup("INGRID_REGISTRY_URL") {
            config.registry_url = v;
        }
        config.registry_api_key = lookup("USDA_ORGANIC_API_KEY").filter(|k| !k.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    pub fn registry_wait(&self) -> Duration {
        Duration::from_secs(u64::from(self.registry_wait_seconds))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_seconds))
    }

    pub fn has_registry_key(&self) -> bool {
        self.registry_api_key.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("connect_timeout_seconds", self.connect_timeout_seconds),
            ("request_timeout_seconds", self.request_timeout_seconds),
            ("registry_wait_seconds", self.registry_wait_seconds),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }

        for url in [&self.catalog_base_url, &self.registry_url] {
            let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("{url}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }

        Ok(())
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
