use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::certification::CertificationDetector;
use super::extractor::{ExtractionStrategy, IngredientExtractor};
use crate::network::{
    lookup_with_timeout, merge, CatalogLookup, CatalogRecord, HttpClient, NetworkConfig,
    OpenFoodFactsCatalog, RegistryLookup, UsdaOrganicRegistry,
};
use crate::ocr::{OcrEngine, TesseractOcr};
use crate::product::{ProductInfo, ScanType};
use crate::text::RawText;

const OCR_PRODUCT_NAME: &str = "OCR Scanned Product";
const TEXT_PRODUCT_NAME: &str = "Scanned Label";

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ExtractionStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_available: Option<bool>,
    pub ocr_fragments: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanOutput {
    pub product: ProductInfo,
    pub stats: ScanStats,
}

/// Wires extraction, certification and rating to the injected collaborators.
pub struct ScanPipeline {
    extractor: IngredientExtractor,
    detector: CertificationDetector,
    catalog: Arc<dyn CatalogLookup>,
    registry: Arc<dyn RegistryLookup>,
    ocr: Arc<dyn OcrEngine>,
    registry_wait: Duration,
}

impl ScanPipeline {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogLookup>,
        registry: Arc<dyn RegistryLookup>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            extractor: IngredientExtractor::default(),
            detector: CertificationDetector::default(),
            catalog,
            registry,
            ocr,
            registry_wait: NetworkConfig::default().registry_wait(),
        }
    }

    /// Open Food Facts, the USDA registry and a `tesseract` found on `PATH`.
    pub fn from_config(config: NetworkConfig) -> crate::Result<Self> {
        let wait = config.registry_wait();
        let client = HttpClient::new(config)?;

        Ok(Self::new(
            Arc::new(OpenFoodFactsCatalog::new(client.clone())),
            Arc::new(UsdaOrganicRegistry::new(client)),
            Arc::new(TesseractOcr::new()),
        )
        .with_registry_wait(wait))
    }

    #[must_use]
    pub fn with_registry_wait(mut self, wait: Duration) -> Self {
        self.registry_wait = wait;
        self
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: IngredientExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_detector(mut self, detector: CertificationDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn ocr_available(&self) -> bool {
        self.ocr.is_available()
    }

    /// Label text analysed without any collaborator.
    pub fn analyze_text(&self, text: &RawText) -> ScanOutput {
        let start = Instant::now();
        let (product, strategy) = self.analyze(text, TEXT_PRODUCT_NAME, ScanType::Text);

        ScanOutput {
            product,
            stats: ScanStats {
                strategy: Some(strategy),
                duration_ms: elapsed_ms(start),
                ..Default::default()
            },
        }
    }

    pub async fn scan_image(&self, image: &[u8]) -> ScanOutput {
        let start = Instant::now();

        if !self.ocr.is_available() {
            tracing::warn!("OCR engine {} unavailable, returning placeholder", self.ocr.name());
            return ScanOutput {
                product: ProductInfo::service_unavailable(),
                stats: ScanStats {
                    duration_ms: elapsed_ms(start),
                    ..Default::default()
                },
            };
        }

        let fragments = match self.ocr.recognize(image).await {
            Ok(fragments) => fragments,
            Err(e) => {
                tracing::warn!("OCR failed, analysing empty text: {}", e);
                Vec::new()
            }
        };

        let text = RawText::from_fragments(&fragments);
        let (product, strategy) = self.analyze(&text, OCR_PRODUCT_NAME, ScanType::Ocr);

        tracing::info!(
            ingredients = product.ingredient_count,
            rating = %product.rating,
            "OCR scan complete"
        );

        ScanOutput {
            product,
            stats: ScanStats {
                strategy: Some(strategy),
                ocr_fragments: fragments.len(),
                duration_ms: elapsed_ms(start),
                ..Default::default()
            },
        }
    }

    pub async fn scan_barcode(&self, barcode: &str) -> ScanOutput {
        let start = Instant::now();

        let record = match self.catalog.lookup(barcode).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::info!("Barcode {} not in catalog", barcode);
                CatalogRecord::fallback(barcode)
            }
            Err(e) => {
                tracing::warn!("Catalog lookup failed for {}: {}", barcode, e);
                CatalogRecord::fallback(barcode)
            }
        };

        let cert_text = record.certification_text();
        let (ingredients, outcome) = tokio::join!(
            async { record.ingredients() },
            lookup_with_timeout(
                self.registry.as_ref(),
                &record.name,
                record.brand.as_deref(),
                self.registry_wait,
            ),
        );
        let certifications = merge(&outcome, &self.detector.detect(&cert_text));

        let product = ProductInfo::new(record.name, ScanType::Barcode, ingredients)
            .with_barcode(barcode.to_string())
            .with_brand(record.brand)
            .with_certifications(certifications)
            .with_image_url(record.image_url);

        tracing::info!(
            barcode,
            ingredients = product.ingredient_count,
            rating = %product.rating,
            "Barcode scan complete"
        );

        ScanOutput {
            product,
            stats: ScanStats {
                registry_available: Some(outcome.is_available()),
                duration_ms: elapsed_ms(start),
                ..Default::default()
            },
        }
    }

    fn analyze(
        &self,
        text: &RawText,
        name: &str,
        scan_type: ScanType,
    ) -> (ProductInfo, ExtractionStrategy) {
        let (ingredients, strategy) = self.extractor.extract_with_strategy(text);
        let certifications = self.detector.detect(text.as_str());

        let product = ProductInfo::new(name.to_string(), scan_type, ingredients)
            .with_certifications(certifications);

        (product, strategy)
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
