use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::client::{ClientError, HttpClient};
use crate::ingest::detect_certifications;
use crate::product::{Certification, CertificationSet};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry request failed: {0}")]
    Client(#[from] ClientError),
    #[error("Registry lookup timed out after {0:?}")]
    TimedOut(Duration),
    #[error("Malformed registry response: {0}")]
    MalformedResponse(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Authoritative certification source consulted by product name and brand.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn lookup(&self, name: &str, brand: Option<&str>) -> RegistryResult<Vec<Certification>>;
}

/// What the registry said, or why it could not say anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryOutcome {
    Confirmed(Vec<Certification>),
    Unavailable(String),
}

impl RegistryOutcome {
    pub fn certifications(&self) -> &[Certification] {
        match self {
            Self::Confirmed(certs) => certs,
            Self::Unavailable(_) => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

/// Runs a registry lookup under a bounded wait; never fails.
pub async fn lookup_with_timeout(
    registry: &dyn RegistryLookup,
    name: &str,
    brand: Option<&str>,
    wait: Duration,
) -> RegistryOutcome {
    let result = match tokio::time::timeout(wait, registry.lookup(name, brand)).await {
        Ok(result) => result,
        Err(_) => Err(RegistryError::TimedOut(wait)),
    };

    match result {
        Ok(certs) => RegistryOutcome::Confirmed(certs),
        Err(e) => {
            tracing::warn!("Registry check failed for {:?}: {}", name, e);
            RegistryOutcome::Unavailable(e.to_string())
        }
    }
}

/// Registry labels first in their own order, then text-detected labels not
/// already present. `Organic` is dropped when `USDA Organic` was confirmed.
pub fn merge(outcome: &RegistryOutcome, text_certs: &CertificationSet) -> CertificationSet {
    let mut merged: CertificationSet = outcome.certifications().iter().copied().collect();

    for cert in text_certs {
        merged.insert(*cert);
    }

    merged
}

pub async fn merge_certifications(
    registry: &dyn RegistryLookup,
    name: &str,
    brand: Option<&str>,
    text: &str,
    wait: Duration,
) -> CertificationSet {
    let outcome = lookup_with_timeout(registry, name, brand, wait).await;
    merge(&outcome, &detect_certifications(text))
}

/// Registry that is never consulted; every lookup confirms nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegistry;

#[async_trait]
impl RegistryLookup for NoRegistry {
    async fn lookup(&self, _name: &str, _brand: Option<&str>) -> RegistryResult<Vec<Certification>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// USDA Organic Integrity Database search.
pub struct UsdaOrganicRegistry {
    client: HttpClient,
    url: String,
    api_key: Option<String>,
    limit: u32,
}

impl UsdaOrganicRegistry {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        let config = client.config();
        Self {
            url: config.registry_url.clone(),
            api_key: config.registry_api_key.clone(),
            limit: config.registry_result_limit,
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, term: &str, api_key: &str) -> RegistryResult<bool> {
        let query = [
            ("q", term.to_string()),
            ("api_key", api_key.to_string()),
            ("limit", self.limit.to_string()),
        ];

        let body: serde_json::Value = self.client.get_json(&self.url, &query).await?;
        let response: SearchResponse = serde_json::from_value(body)
            .map_err(|e| RegistryError::MalformedResponse(e.to_string()))?;

        Ok(results_confirm_organic(&response.results))
    }
}

fn results_confirm_organic(results: &[serde_json::Value]) -> bool {
    results
        .iter()
        .any(|result| result.to_string().to_lowercase().contains("organic"))
}

fn search_terms<'a>(name: &'a str, brand: Option<&'a str>) -> Vec<&'a str> {
    std::iter::once(name)
        .chain(brand)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

#[async_trait]
impl RegistryLookup for UsdaOrganicRegistry {
    async fn lookup(&self, name: &str, brand: Option<&str>) -> RegistryResult<Vec<Certification>> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("No registry API key configured, skipping lookup");
            return Ok(Vec::new());
        };

        let terms = search_terms(name, brand);
        confirm_any(&terms, |term| self.search(term, api_key)).await
    }
}

/// Searches each term in turn until one confirms.
///
/// A failed term is logged and skipped. The lookup errors only when no term
/// got an answer at all.
async fn confirm_any<'a, F, Fut>(
    terms: &[&'a str],
    mut search: F,
) -> RegistryResult<Vec<Certification>>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = RegistryResult<bool>>,
{
    let mut last_error = None;
    let mut answered = false;

    for &term in terms {
        match search(term).await {
            Ok(true) => return Ok(vec![Certification::UsdaOrganic]),
            Ok(false) => answered = true,
            Err(e) => {
                tracing::warn!("Registry request failed for term {:?}: {}", term, e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if !answered => Err(e),
        _ => Ok(Vec::new()),
    }
}
