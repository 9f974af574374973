use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::config::NetworkConfig;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Thin reqwest wrapper applying the configured timeouts and user agent.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: NetworkConfig,
    inner: Client,
}

impl HttpClient {
    pub fn new(config: NetworkConfig) -> ClientResult<Self> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(default_user_agent);

        let inner = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(user_agent)
            .build()?;

        Ok(Self { config, inner })
    }

    fn validate_request(url: &str) -> ClientResult<Url> {
        let parsed = Url::parse(url)?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        if parsed.host_str().is_none() {
            return Err(ClientError::InvalidUrl("No host in URL".to_string()));
        }

        Ok(parsed)
    }

    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> ClientResult<Response> {
        let url = Self::validate_request(url)?;

        let response = self.inner.get(url.clone()).query(query).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let response = self.get(url, query).await?;
        Ok(response.json::<T>().await?)
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

fn default_user_agent() -> String {
    format!("ingrid/{}", env!("CARGO_PKG_VERSION"))
}
