//! Shipping methods.

use crate::ids::{MethodId, ZoneId};
use crate::model::default_true;
use crate::model::zone::slugify;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A named shipping option offered at checkout (e.g. "Standard Flat Rate").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingMethod {
    pub id: MethodId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    /// Free-form classification ("standard", "express", ...). Not used for matching.
    #[serde(default)]
    pub method_type: String,
    /// Carrier name (e.g. "UPS", "in-house").
    #[serde(default)]
    pub carrier_type: Option<String>,
    /// Zone this method is restricted to. `None` means available everywhere.
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i32,
    /// Delivery estimate shown to the shopper (e.g. "3-5").
    #[serde(default)]
    pub estimated_days: Option<String>,
    /// At most one method carries this flag; the admin layer enforces it.
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub requires_signature: bool,
    #[serde(default)]
    pub is_insured: bool,
    #[serde(default)]
    pub insurance_amount: Money,
}

impl ShippingMethod {
    /// Create an active method available in every zone.
    pub fn new(id: impl Into<MethodId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            slug: slugify(&name),
            name,
            method_type: "standard".to_string(),
            carrier_type: None,
            zone_id: None,
            is_active: true,
            priority: 0,
            estimated_days: None,
            is_default: false,
            requires_signature: false,
            is_insured: false,
            insurance_amount: Money::ZERO,
        }
    }

    pub fn in_zone(mut self, zone_id: impl Into<ZoneId>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_estimated_days(mut self, days: impl Into<String>) -> Self {
        self.estimated_days = Some(days.into());
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn insured(mut self, amount: Money) -> Self {
        self.is_insured = true;
        self.insurance_amount = amount;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Whether the method is offered in every zone.
    pub fn is_global(&self) -> bool {
        self.zone_id.is_none()
    }
}
