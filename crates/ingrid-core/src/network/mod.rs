mod catalog;
mod client;
mod config;
mod registry;

pub use catalog::{
    CatalogError, CatalogLookup, CatalogRecord, CatalogResult, EmptyCatalog, OpenFoodFactsCatalog,
};
pub use client::{ClientError, ClientResult, HttpClient};
pub use config::{ConfigError, NetworkConfig, DEFAULT_CATALOG_URL, DEFAULT_REGISTRY_URL};
pub use registry::{
    lookup_with_timeout, merge, merge_certifications, NoRegistry, RegistryError, RegistryLookup,
    RegistryOutcome, RegistryResult, UsdaOrganicRegistry,
};
