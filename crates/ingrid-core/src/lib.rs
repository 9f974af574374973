//! Food label analysis: ingredient extraction from OCR or catalog text,
//! organic / non-GMO certification detection and a traffic-light rating.

pub mod error;
pub mod ingest;
pub mod network;
pub mod ocr;
pub mod product;
pub mod text;

pub use error::{Error, Result};
pub use ingest::{
    compute_rating, detect_certifications, extract_ingredients, split_ingredient_text,
    CertificationDetector, ExtractionStrategy, IngredientExtractor, Language, ScanOutput,
    ScanPipeline, ScanStats,
};
pub use network::{
    merge_certifications, CatalogLookup, CatalogRecord, HttpClient, NetworkConfig,
    OpenFoodFactsCatalog, RegistryLookup, RegistryOutcome, UsdaOrganicRegistry,
};
pub use ocr::{OcrEngine, TesseractOcr, UnavailableOcr};
pub use product::{
    Certification, CertificationSet, IngredientList, ProductInfo, Rating, ScanType,
    MAX_INGREDIENTS,
};
pub use text::RawText;
