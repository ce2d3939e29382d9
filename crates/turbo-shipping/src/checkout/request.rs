//! Checkout request as received from the storefront.

use crate::checkout::ShippingAddress;
use crate::error::{ShippingError, ShippingResult};
use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One cart line submitted for a shipping quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price.
    pub price: Money,
    /// Unit weight. Falls back to the configured default when absent.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

impl CheckoutItem {
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price,
            weight: None,
            category_ids: Vec::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn in_categories(mut self, ids: &[&str]) -> Self {
        self.category_ids = ids.iter().map(|id| CategoryId::new(*id)).collect();
        self
    }
}

/// A request for shipping options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    pub order_value: Money,
    /// Explicit holiday flag. When absent the engine consults its holiday calendar.
    #[serde(default)]
    pub is_holiday: Option<bool>,
    /// Distance to the destination, for distance-based rates.
    #[serde(default)]
    pub distance: Option<f64>,
}

impl CheckoutRequest {
    pub fn new(items: Vec<CheckoutItem>, address: ShippingAddress, order_value: Money) -> Self {
        Self {
            items,
            shipping_address: Some(address),
            order_value,
            is_holiday: None,
            distance: None,
        }
    }

    pub fn on_holiday(mut self, is_holiday: bool) -> Self {
        self.is_holiday = Some(is_holiday);
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Reject malformed input before any matching runs.
    pub fn validate(&self) -> ShippingResult<()> {
        if self.items.is_empty() {
            return Err(ShippingError::validation("checkout has no items"));
        }

        for item in &self.items {
            if item.quantity == 0 {
                return Err(ShippingError::Validation(format!(
                    "item {} has zero quantity",
                    item.product_id
                )));
            }
            if let Some(weight) = item.weight {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(ShippingError::Validation(format!(
                        "item {} has invalid weight {}",
                        item.product_id, weight
                    )));
                }
            }
        }

        match &self.shipping_address {
            None => return Err(ShippingError::validation("shipping address is required")),
            Some(address) if !address.is_complete() => {
                return Err(ShippingError::validation("shipping address has no country"))
            }
            Some(_) => {}
        }

        if !self.order_value.is_positive() {
            return Err(ShippingError::Validation(format!(
                "order value must be greater than zero, got {}",
                self.order_value
            )));
        }

        if let Some(distance) = self.distance {
            if !distance.is_finite() || distance < 0.0 {
                return Err(ShippingError::Validation(format!(
                    "invalid distance {}",
                    distance
                )));
            }
        }

        Ok(())
    }
}
