//! Catalog entities: zones, methods and rates.
//!
//! The engine treats these as an immutable snapshot for the duration of one
//! calculation. They are created and edited by the admin layer.

mod method;
mod rate;
mod zone;

pub use method::ShippingMethod;
pub use rate::{
    DistanceTier, ItemTier, PriceTier, RateKind, RateType, ShippingRate, WeightTier,
};
pub use zone::{ShippingZone, ZoneType};

pub(crate) fn default_true() -> bool {
    true
}
