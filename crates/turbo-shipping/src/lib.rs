//! Shipping cost engine for TurboCommerce.
//!
//! Given a checkout (items, destination and order value) and a catalog of
//! shipping zones, methods and rates, this crate works out which shipping
//! options are available and what each one costs.
//!
//! - **Model**: zones, methods and rates as stored in the catalog
//! - **Matching**: zone membership and best-rate selection per method
//! - **Cost**: itemised breakdown of the winning rate
//! - **Engine**: options for a checkout, cheapest first
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_shipping::prelude::*;
//!
//! let snapshot = CatalogSnapshot::load("catalog.toml")?;
//! let engine = ShippingEngine::new(InMemoryCatalog::new(snapshot));
//!
//! let checkout = CheckoutRequest::new(
//!     vec![CheckoutItem::new("book-001", 2, Money::from_decimal(24.99)).with_weight(0.8)],
//!     ShippingAddress::new("US", "CA", "Oakland", "94607"),
//!     Money::from_decimal(49.98),
//! );
//!
//! for option in engine.calculate_options(&checkout).await? {
//!     println!("{}: {}", option.method_name, option.total_cost);
//! }
//! ```

pub mod config;
pub mod cost;
pub mod error;
pub mod ids;
pub mod money;

pub mod checkout;
pub mod engine;
pub mod matching;
pub mod model;
pub mod store;

pub use config::EngineConfig;
pub use engine::{ShippingEngine, ShippingOption};
pub use error::{ShippingError, ShippingResult};
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::error::{ShippingError, ShippingResult};
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog records
    pub use crate::model::{
        DistanceTier, ItemTier, PriceTier, RateKind, RateType, ShippingMethod, ShippingRate,
        ShippingZone, WeightTier, ZoneType,
    };

    // Checkout input
    pub use crate::checkout::{CheckoutItem, CheckoutRequest, OrderContext, ShippingAddress};

    // Matching and pricing
    pub use crate::cost::{CostBreakdown, CostCalculator};
    pub use crate::matching::{
        MatchObserver, RateEvaluation, RateMatcher, RecordingObserver, ZoneMatcher,
    };

    // Engine
    pub use crate::engine::{ShippingEngine, ShippingOption};
    pub use crate::store::{CatalogError, CatalogSnapshot, InMemoryCatalog, ShippingCatalog};
}
