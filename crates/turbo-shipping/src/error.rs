//! Shipping engine error types.

use crate::ids::MethodId;
use crate::store::CatalogError;
use thiserror::Error;

/// Errors returned by the shipping engine.
///
/// A method without a matching rate is not an error; lookups report that
/// case as `Ok(None)`.
#[derive(Error, Debug)]
pub enum ShippingError {
    /// Caller-supplied checkout input is malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown shipping method.
    #[error("Shipping method not found: {0}")]
    MethodNotFound(MethodId),

    /// The catalog backend failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Engine configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShippingError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ShippingError::Validation(message.into())
    }
}

impl From<toml::de::Error> for ShippingError {
    fn from(e: toml::de::Error) -> Self {
        ShippingError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for ShippingError {
    fn from(e: serde_json::Error) -> Self {
        ShippingError::Config(e.to_string())
    }
}

/// Result alias for engine operations.
pub type ShippingResult<T> = Result<T, ShippingError>;
