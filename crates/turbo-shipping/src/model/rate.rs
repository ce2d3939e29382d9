//! Shipping rates.
//!
//! A rate is one pricing rule attached to a method. Its [`RateKind`] decides
//! both which range constraint applies during matching and which formula
//! prices it; fields that belong to other kinds simply do not exist on it.

use crate::ids::{CategoryId, MethodId, ProductId, RateId};
use crate::model::default_true;
use crate::money::Money;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a [`RateKind`], as exposed in checkout options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    FlatRate,
    WeightBased,
    PriceBased,
    DistanceBased,
    ItemBased,
    Free,
}

impl RateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateType::FlatRate => "flat_rate",
            RateType::WeightBased => "weight_based",
            RateType::PriceBased => "price_based",
            RateType::DistanceBased => "distance_based",
            RateType::ItemBased => "item_based",
            RateType::Free => "free",
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weight bracket: charged per started `weight_unit` above `min_weight`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeightTier {
    #[serde(default)]
    pub min_weight: Option<f64>,
    #[serde(default)]
    pub max_weight: Option<f64>,
    /// Size of one billable step (e.g. `1.0` for per-kilogram).
    #[serde(default)]
    pub weight_unit: Option<f64>,
    /// Charge per step.
    #[serde(default)]
    pub additional_rate: Money,
}

/// Order value bracket: a percentage of the value above `min_order_value`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceTier {
    #[serde(default)]
    pub min_order_value: Option<Money>,
    #[serde(default)]
    pub max_order_value: Option<Money>,
    /// Percentage (e.g. `5.0` for 5%).
    #[serde(default)]
    pub additional_rate: f64,
}

/// Distance bracket: charged per started `distance_unit` above `min_distance`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DistanceTier {
    #[serde(default)]
    pub min_distance: Option<f64>,
    #[serde(default)]
    pub max_distance: Option<f64>,
    #[serde(default)]
    pub distance_unit: Option<f64>,
    #[serde(default)]
    pub additional_rate: Money,
}

/// Item count pricing: the base rate covers `first_item_count` items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemTier {
    #[serde(default = "default_first_item_count")]
    pub first_item_count: u32,
    #[serde(default)]
    pub additional_item_rate: Money,
    /// Stored for the admin layer; not enforced by matching.
    #[serde(default)]
    pub max_items: Option<u32>,
}

fn default_first_item_count() -> u32 {
    1
}

impl Default for ItemTier {
    fn default() -> Self {
        Self {
            first_item_count: default_first_item_count(),
            additional_item_rate: Money::ZERO,
            max_items: None,
        }
    }
}

/// Pricing rule variant, tagged by `rate_type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rate_type", rename_all = "snake_case")]
pub enum RateKind {
    FlatRate,
    WeightBased(WeightTier),
    PriceBased(PriceTier),
    DistanceBased(DistanceTier),
    ItemBased(ItemTier),
    Free,
}

impl RateKind {
    pub fn rate_type(&self) -> RateType {
        match self {
            RateKind::FlatRate => RateType::FlatRate,
            RateKind::WeightBased(_) => RateType::WeightBased,
            RateKind::PriceBased(_) => RateType::PriceBased,
            RateKind::DistanceBased(_) => RateType::DistanceBased,
            RateKind::ItemBased(_) => RateType::ItemBased,
            RateKind::Free => RateType::Free,
        }
    }
}

/// A pricing rule attached to one shipping method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingRate {
    pub id: RateId,
    pub method_id: MethodId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: RateKind,
    #[serde(default)]
    pub base_rate: Money,
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Rates flagged free-shipping rank higher once the threshold is met.
    #[serde(default)]
    pub is_free_shipping: bool,
    /// Missing threshold counts as zero.
    #[serde(default)]
    pub free_shipping_threshold: Option<Money>,

    #[serde(default = "default_true")]
    pub applies_to_all_products: bool,
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    #[serde(default)]
    pub excluded_product_ids: Vec<ProductId>,
    #[serde(default)]
    pub excluded_category_ids: Vec<CategoryId>,

    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
    /// Only offered when the checkout happens on a holiday.
    #[serde(default)]
    pub is_holiday_rate: bool,
    #[serde(default)]
    pub holiday_dates: Vec<NaiveDate>,

    #[serde(default)]
    pub handling_fee: Money,
    #[serde(default)]
    pub insurance_fee: Money,
    #[serde(default)]
    pub signature_fee: Money,
}

impl ShippingRate {
    /// Create an active rate that applies to all products, with no fees.
    pub fn new(
        id: impl Into<RateId>,
        method_id: impl Into<MethodId>,
        kind: RateKind,
        base_rate: Money,
    ) -> Self {
        Self {
            id: id.into(),
            method_id: method_id.into(),
            name: String::new(),
            description: None,
            kind,
            base_rate,
            is_active: true,
            is_free_shipping: false,
            free_shipping_threshold: None,
            applies_to_all_products: true,
            product_ids: Vec::new(),
            category_ids: Vec::new(),
            excluded_product_ids: Vec::new(),
            excluded_category_ids: Vec::new(),
            valid_from: None,
            valid_to: None,
            is_holiday_rate: false,
            holiday_dates: Vec::new(),
            handling_fee: Money::ZERO,
            insurance_fee: Money::ZERO,
            signature_fee: Money::ZERO,
        }
    }

    pub fn rate_type(&self) -> RateType {
        self.kind.rate_type()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restrict the rate to specific products (clears "all products").
    pub fn for_products(mut self, ids: &[&str]) -> Self {
        self.applies_to_all_products = false;
        self.product_ids = ids.iter().map(|id| ProductId::new(*id)).collect();
        self
    }

    /// Restrict the rate to specific categories (clears "all products").
    pub fn for_categories(mut self, ids: &[&str]) -> Self {
        self.applies_to_all_products = false;
        self.category_ids = ids.iter().map(|id| CategoryId::new(*id)).collect();
        self
    }

    pub fn excluding_products(mut self, ids: &[&str]) -> Self {
        self.excluded_product_ids = ids.iter().map(|id| ProductId::new(*id)).collect();
        self
    }

    pub fn excluding_categories(mut self, ids: &[&str]) -> Self {
        self.excluded_category_ids = ids.iter().map(|id| CategoryId::new(*id)).collect();
        self
    }

    pub fn valid_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.valid_from = from;
        self.valid_to = to;
        self
    }

    pub fn holiday_only(mut self) -> Self {
        self.is_holiday_rate = true;
        self
    }

    pub fn free_shipping_over(mut self, threshold: Money) -> Self {
        self.is_free_shipping = true;
        self.free_shipping_threshold = Some(threshold);
        self
    }

    pub fn with_fees(mut self, handling: Money, insurance: Money, signature: Money) -> Self {
        self.handling_fee = handling;
        self.insurance_fee = insurance;
        self.signature_fee = signature;
        self
    }
}
