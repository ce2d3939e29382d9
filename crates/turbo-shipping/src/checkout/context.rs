//! Order context: the facts about a checkout that rates are evaluated against.

use crate::checkout::CheckoutRequest;
use crate::config::EngineConfig;
use crate::error::ShippingResult;
use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derived, per-request view of a checkout.
///
/// `weight` and `distance` are optional because a rate that declares a range
/// on a missing dimension must be rejected rather than priced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OrderContext {
    pub weight: Option<f64>,
    pub order_value: Money,
    pub distance: Option<f64>,
    pub item_count: u32,
    pub product_ids: Vec<ProductId>,
    pub category_ids: Vec<CategoryId>,
    pub is_holiday: bool,
}

impl OrderContext {
    /// Context with only an order value set.
    pub fn new(order_value: Money) -> Self {
        Self {
            order_value,
            ..Self::default()
        }
    }

    /// Validate a checkout and derive its context.
    ///
    /// `today` is the request date, used to resolve the holiday flag when the
    /// checkout leaves it unset.
    pub fn from_checkout(
        checkout: &CheckoutRequest,
        config: &EngineConfig,
        today: NaiveDate,
    ) -> ShippingResult<Self> {
        checkout.validate()?;

        let weight: f64 = checkout
            .items
            .iter()
            .map(|item| item.weight.unwrap_or(config.default_item_weight) * f64::from(item.quantity))
            .sum();

        let item_count = checkout
            .items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity));

        let mut product_ids: Vec<ProductId> = Vec::new();
        let mut category_ids: Vec<CategoryId> = Vec::new();
        for item in &checkout.items {
            if !product_ids.contains(&item.product_id) {
                product_ids.push(item.product_id.clone());
            }
            for category in &item.category_ids {
                if !category_ids.contains(category) {
                    category_ids.push(category.clone());
                }
            }
        }

        let is_holiday = checkout
            .is_holiday
            .unwrap_or_else(|| config.is_holiday(today));

        Ok(Self {
            weight: Some(weight),
            order_value: checkout.order_value,
            distance: checkout.distance,
            item_count,
            product_ids,
            category_ids,
            is_holiday,
        })
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_item_count(mut self, item_count: u32) -> Self {
        self.item_count = item_count;
        self
    }

    pub fn with_products(mut self, ids: &[&str]) -> Self {
        self.product_ids = ids.iter().map(|id| ProductId::new(*id)).collect();
        self
    }

    pub fn with_categories(mut self, ids: &[&str]) -> Self {
        self.category_ids = ids.iter().map(|id| CategoryId::new(*id)).collect();
        self
    }

    pub fn on_holiday(mut self) -> Self {
        self.is_holiday = true;
        self
    }
}
