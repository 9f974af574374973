use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::client::{ClientError, HttpClient};
use crate::ingest::split_ingredient_text;
use crate::product::IngredientList;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid barcode: {0:?}")]
    InvalidBarcode(String),
    #[error("Catalog request failed: {0}")]
    Client(#[from] ClientError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Product metadata as published by an external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub ingredients_text: String,
    #[serde(default)]
    pub labels: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CatalogRecord {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            brand: None,
            ingredients_text: String::new(),
            labels: String::new(),
            image_url: None,
        }
    }

    /// Stand-in used when the catalog has nothing for a barcode.
    #[must_use]
    pub fn fallback(barcode: &str) -> Self {
        Self::new(format!("Product {barcode}"))
    }

    #[must_use]
    pub fn with_brand(mut self, brand: String) -> Self {
        self.brand = Some(brand);
        self
    }

    #[must_use]
    pub fn with_ingredients_text(mut self, text: String) -> Self {
        self.ingredients_text = text;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: String) -> Self {
        self.labels = labels;
        self
    }

    /// Catalog ingredients are already a list; only the separator split applies.
    pub fn ingredients(&self) -> IngredientList {
        split_ingredient_text(&self.ingredients_text)
    }

    /// Text scanned for certification keywords.
    pub fn certification_text(&self) -> String {
        format!("{} {}", self.ingredients_text, self.labels)
    }
}

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn lookup(&self, barcode: &str) -> CatalogResult<Option<CatalogRecord>>;
}

/// Catalog that never knows any product.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

#[async_trait]
impl CatalogLookup for EmptyCatalog {
    async fn lookup(&self, _barcode: &str) -> CatalogResult<Option<CatalogRecord>> {
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: i64,
    product: Option<ProductFields>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductFields {
    product_name: Option<String>,
    brands: Option<String>,
    ingredients_text: Option<String>,
    labels: Option<String>,
    image_url: Option<String>,
}

impl ProductResponse {
    fn into_record(self) -> Option<CatalogRecord> {
        if self.status != 1 {
            return None;
        }
        let product = self.product?;

        let name = product
            .product_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown Product".to_string());

        let brand = product.brands.as_deref().and_then(|brands| {
            brands
                .split(',')
                .next()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(String::from)
        });

        Some(CatalogRecord {
            name,
            brand,
            ingredients_text: product.ingredients_text.unwrap_or_default(),
            labels: product.labels.unwrap_or_default(),
            image_url: product.image_url,
        })
    }
}

/// Open Food Facts product lookup by barcode.
pub struct OpenFoodFactsCatalog {
    client: HttpClient,
    base_url: String,
}

impl OpenFoodFactsCatalog {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        let base_url = client.config().catalog_base_url.trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn product_url(&self, barcode: &str) -> CatalogResult<String> {
        let barcode = barcode.trim();
        if barcode.is_empty() || !barcode.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CatalogError::InvalidBarcode(barcode.to_string()));
        }
        Ok(format!("{}/api/v0/product/{}.json", self.base_url, barcode))
    }
}

#[async_trait]
impl CatalogLookup for OpenFoodFactsCatalog {
    async fn lookup(&self, barcode: &str) -> CatalogResult<Option<CatalogRecord>> {
        let url = self.product_url(barcode)?;
        let response: ProductResponse = self.client.get_json(&url, &[]).await?;
        Ok(response.into_record())
    }
}
