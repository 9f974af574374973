use thiserror::Error;

use crate::network::{CatalogError, ClientError, ConfigError, RegistryError};
use crate::ocr::OcrError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("HTTP client error: {0}")]
    Client(#[from] ClientError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    #[error("Invalid certification: {0}")]
    InvalidCertification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
