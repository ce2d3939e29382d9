//! Cost calculation for a resolved rate.
//!
//! Every component is clamped at zero individually, so the total is both
//! non-negative and exactly the sum of its breakdown.

use crate::checkout::OrderContext;
use crate::model::{DistanceTier, ItemTier, PriceTier, RateKind, ShippingRate, WeightTier};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Itemized cost of shipping an order with one rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub base_rate: Money,
    pub additional_cost: Money,
    pub handling_fee: Money,
    pub insurance_fee: Money,
    pub signature_fee: Money,
}

impl CostBreakdown {
    pub const ZERO: CostBreakdown = CostBreakdown {
        base_rate: Money::ZERO,
        additional_cost: Money::ZERO,
        handling_fee: Money::ZERO,
        insurance_fee: Money::ZERO,
        signature_fee: Money::ZERO,
    };

    /// Sum of all components.
    pub fn total(&self) -> Money {
        self.base_rate
            + self.additional_cost
            + self.handling_fee
            + self.insurance_fee
            + self.signature_fee
    }
}

/// Prices a rate against an order context.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostCalculator;

impl CostCalculator {
    /// Itemized cost. Free rates cost nothing, fees included.
    pub fn compute_breakdown(rate: &ShippingRate, ctx: &OrderContext) -> CostBreakdown {
        let additional_cost = match &rate.kind {
            RateKind::Free => return CostBreakdown::ZERO,
            RateKind::FlatRate => Money::ZERO,
            RateKind::WeightBased(tier) => weight_surcharge(tier, ctx),
            RateKind::PriceBased(tier) => order_value_surcharge(tier, ctx),
            RateKind::DistanceBased(tier) => distance_surcharge(tier, ctx),
            RateKind::ItemBased(tier) => item_surcharge(tier, ctx),
        };

        CostBreakdown {
            base_rate: rate.base_rate.non_negative(),
            additional_cost: additional_cost.non_negative(),
            handling_fee: rate.handling_fee.non_negative(),
            insurance_fee: rate.insurance_fee.non_negative(),
            signature_fee: rate.signature_fee.non_negative(),
        }
    }

    /// Total cost of a breakdown.
    pub fn compute_total(breakdown: &CostBreakdown) -> Money {
        breakdown.total().non_negative()
    }

    /// Breakdown and total in one call.
    pub fn quote(rate: &ShippingRate, ctx: &OrderContext) -> (CostBreakdown, Money) {
        let breakdown = Self::compute_breakdown(rate, ctx);
        let total = Self::compute_total(&breakdown);
        (breakdown, total)
    }
}

fn weight_surcharge(tier: &WeightTier, ctx: &OrderContext) -> Money {
    match (ctx.weight, tier.weight_unit) {
        (Some(weight), Some(unit)) => {
            tier.additional_rate * billable_steps(weight, tier.min_weight.unwrap_or(0.0), unit)
        }
        _ => Money::ZERO,
    }
}

fn order_value_surcharge(tier: &PriceTier, ctx: &OrderContext) -> Money {
    let floor = tier.min_order_value.unwrap_or(Money::ZERO);
    (ctx.order_value - floor)
        .non_negative()
        .percentage(tier.additional_rate)
}

fn distance_surcharge(tier: &DistanceTier, ctx: &OrderContext) -> Money {
    match (ctx.distance, tier.distance_unit) {
        (Some(distance), Some(unit)) => {
            tier.additional_rate * billable_steps(distance, tier.min_distance.unwrap_or(0.0), unit)
        }
        _ => Money::ZERO,
    }
}

fn item_surcharge(tier: &ItemTier, ctx: &OrderContext) -> Money {
    let extra_items = ctx.item_count.saturating_sub(tier.first_item_count);
    tier.additional_item_rate * i64::from(extra_items)
}

/// Number of started `step`s between `floor` and `value`, never negative.
fn billable_steps(value: f64, floor: f64, step: f64) -> i64 {
    if !step.is_finite() || step <= 0.0 || !value.is_finite() || !floor.is_finite() {
        return 0;
    }
    let steps = (value - floor) / step;
    // Trim float noise so that 2.2 / 0.1 bills 22 steps, not 23.
    let steps = (steps * 1e9).round() / 1e9;
    steps.ceil().max(0.0) as i64
}
