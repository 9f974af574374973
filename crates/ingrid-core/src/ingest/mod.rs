mod certification;
mod extractor;
mod pipeline;
mod rating;

pub use certification::{detect_certifications, CertificationDetector, KeywordFamily};
pub use extractor::{
    extract_ingredients, split_ingredient_text, ExtractionStrategy, HeaderPattern,
    IngredientExtractor, Language,
};
pub use pipeline::{ScanOutput, ScanPipeline, ScanStats};
pub use rating::{compute_rating, LOW_MAX, MEDIUM_MAX};
