//! Read-only access to the shipping catalog.
//!
//! The engine never writes zones, methods or rates. Backends hand it
//! snapshots through [`ShippingCatalog`]; errors are passed through to the
//! caller untouched.

mod memory;

pub use memory::{CatalogSnapshot, InMemoryCatalog};

use crate::ids::MethodId;
use crate::model::{ShippingMethod, ShippingRate, ShippingZone};
use async_trait::async_trait;

/// Result type for catalog reads.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog backend errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Backend cannot be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// A query failed.
    #[error("catalog query failed: {0}")]
    Query(String),

    /// Stored data could not be decoded.
    #[error("catalog decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Decode(e.to_string())
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(e: toml::de::Error) -> Self {
        CatalogError::Decode(e.to_string())
    }
}

/// Read contract the engine depends on.
#[async_trait]
pub trait ShippingCatalog: Send + Sync {
    /// Active methods, ordered by priority ascending.
    async fn list_active_methods(&self) -> CatalogResult<Vec<ShippingMethod>>;

    /// Active rates of a method, ordered by base rate ascending.
    async fn list_active_rates(&self, method_id: &MethodId) -> CatalogResult<Vec<ShippingRate>>;

    /// Any method by id, active or not.
    async fn find_method(&self, id: &MethodId) -> CatalogResult<Option<ShippingMethod>>;

    /// Active zones, ordered by priority ascending.
    async fn list_active_zones(&self) -> CatalogResult<Vec<ShippingZone>>;
}
