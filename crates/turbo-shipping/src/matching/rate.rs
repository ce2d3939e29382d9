//! Rate eligibility and scoring.
//!
//! Each candidate rate for a method is either rejected outright by a hard
//! filter or given a score; the highest score wins and ties go to the
//! earliest rate in the input, which callers sort by base rate ascending.

use crate::checkout::OrderContext;
use crate::matching::observer::{MatchObserver, NoopObserver};
use crate::model::{RateKind, RateType, ShippingRate};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const HOLIDAY_PENALTY: i32 = -10;
const ALL_PRODUCTS_BONUS: i32 = 5;
const PRODUCT_MATCH_BONUS: i32 = 3;
const CATEGORY_MATCH_BONUS: i32 = 2;
const WEIGHT_RANGE_BONUS: i32 = 10;
const ORDER_VALUE_RANGE_BONUS: i32 = 8;
const DISTANCE_RANGE_BONUS: i32 = 6;
const FREE_SHIPPING_BONUS: i32 = 20;

/// Why a rate was removed from consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligibility {
    /// `valid_from` is in the future.
    NotYetValid,
    /// `valid_to` is in the past.
    Expired,
    /// Holiday-only rate on a regular day.
    HolidayOnly,
    /// Restricted to products/categories not in the order.
    NotApplicable,
    /// The order contains an excluded product or category.
    Excluded,
    WeightOutOfRange,
    /// The rate declares a weight range but the order has no weight.
    MissingWeight,
    OrderValueOutOfRange,
    DistanceOutOfRange,
    /// The rate declares a distance range but the order has no distance.
    MissingDistance,
}

impl Ineligibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ineligibility::NotYetValid => "not yet valid",
            Ineligibility::Expired => "expired",
            Ineligibility::HolidayOnly => "holiday-only rate",
            Ineligibility::NotApplicable => "not applicable to these products",
            Ineligibility::Excluded => "excluded product or category",
            Ineligibility::WeightOutOfRange => "weight out of range",
            Ineligibility::MissingWeight => "order weight unknown",
            Ineligibility::OrderValueOutOfRange => "order value out of range",
            Ineligibility::DistanceOutOfRange => "distance out of range",
            Ineligibility::MissingDistance => "distance unknown",
        }
    }
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one rate against an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateEvaluation {
    Ineligible(Ineligibility),
    Eligible(i32),
}

impl RateEvaluation {
    pub fn score(&self) -> Option<i32> {
        match self {
            RateEvaluation::Eligible(score) => Some(*score),
            RateEvaluation::Ineligible(_) => None,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, RateEvaluation::Eligible(_))
    }
}

impl fmt::Display for RateEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateEvaluation::Eligible(score) => write!(f, "eligible (score {})", score),
            RateEvaluation::Ineligible(reason) => write!(f, "ineligible: {}", reason),
        }
    }
}

/// The winning rate for a method and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSelection<'r> {
    pub rate: &'r ShippingRate,
    pub score: i32,
}

/// Picks the best rate of a method for an order.
#[derive(Clone, Copy)]
pub struct RateMatcher<'o> {
    observer: &'o dyn MatchObserver,
}

impl Default for RateMatcher<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl RateMatcher<'static> {
    pub fn new() -> Self {
        Self {
            observer: &NoopObserver,
        }
    }
}

impl<'o> RateMatcher<'o> {
    /// Report every evaluation to `observer`.
    pub fn with_observer(observer: &'o dyn MatchObserver) -> Self {
        Self { observer }
    }

    /// Select the highest scoring eligible rate.
    ///
    /// `rates` must be ordered by base rate ascending; on equal scores the
    /// first one wins, i.e. the cheapest base rate.
    pub fn select_best_rate<'r>(
        &self,
        rates: &'r [ShippingRate],
        ctx: &OrderContext,
        now: DateTime<Utc>,
    ) -> Option<RateSelection<'r>> {
        let mut best: Option<RateSelection<'r>> = None;

        for rate in rates {
            let evaluation = Self::evaluate(rate, ctx, now);
            self.observer.rate_evaluated(rate, &evaluation);

            let RateEvaluation::Eligible(score) = evaluation else {
                continue;
            };
            if best.map_or(true, |current| score > current.score) {
                best = Some(RateSelection { rate, score });
            }
        }

        best
    }

    /// Evaluate a single rate. Filters run in a fixed order and the first
    /// failing one is reported.
    pub fn evaluate(rate: &ShippingRate, ctx: &OrderContext, now: DateTime<Utc>) -> RateEvaluation {
        match score_rate(rate, ctx, now) {
            Ok(score) => RateEvaluation::Eligible(score),
            Err(reason) => RateEvaluation::Ineligible(reason),
        }
    }
}

fn score_rate(
    rate: &ShippingRate,
    ctx: &OrderContext,
    now: DateTime<Utc>,
) -> Result<i32, Ineligibility> {
    let mut score = 0;

    if rate.valid_from.is_some_and(|from| now < from) {
        return Err(Ineligibility::NotYetValid);
    }
    if rate.valid_to.is_some_and(|to| now > to) {
        return Err(Ineligibility::Expired);
    }

    match (rate.is_holiday_rate, ctx.is_holiday) {
        (true, false) => return Err(Ineligibility::HolidayOnly),
        (false, true) => score += HOLIDAY_PENALTY,
        _ => {}
    }

    score += applicability_score(rate, ctx)?;

    if intersects(&rate.excluded_product_ids, &ctx.product_ids)
        || intersects(&rate.excluded_category_ids, &ctx.category_ids)
    {
        return Err(Ineligibility::Excluded);
    }

    score += range_score(&rate.kind, ctx)?;

    let threshold = rate.free_shipping_threshold.unwrap_or(Money::ZERO);
    if rate.is_free_shipping && ctx.order_value >= threshold {
        score += FREE_SHIPPING_BONUS;
    }

    Ok(score)
}

fn applicability_score(rate: &ShippingRate, ctx: &OrderContext) -> Result<i32, Ineligibility> {
    if ctx.product_ids.is_empty() {
        // Without product context only item-based catch-all rates get the
        // bonus; every other rate passes unscored.
        if rate.applies_to_all_products && rate.rate_type() == RateType::ItemBased {
            return Ok(ALL_PRODUCTS_BONUS);
        }
        return Ok(0);
    }

    if rate.applies_to_all_products {
        Ok(ALL_PRODUCTS_BONUS)
    } else if intersects(&rate.product_ids, &ctx.product_ids) {
        Ok(PRODUCT_MATCH_BONUS)
    } else if intersects(&rate.category_ids, &ctx.category_ids) {
        Ok(CATEGORY_MATCH_BONUS)
    } else {
        Err(Ineligibility::NotApplicable)
    }
}

/// Range constraints only apply to the dimension the rate is priced on.
fn range_score(kind: &RateKind, ctx: &OrderContext) -> Result<i32, Ineligibility> {
    match kind {
        RateKind::WeightBased(tier) => measured_range(
            tier.min_weight,
            tier.max_weight,
            ctx.weight,
            WEIGHT_RANGE_BONUS,
            Ineligibility::MissingWeight,
            Ineligibility::WeightOutOfRange,
        ),
        RateKind::PriceBased(tier) => match (tier.min_order_value, tier.max_order_value) {
            (Some(min), Some(max)) if (min..=max).contains(&ctx.order_value) => {
                Ok(ORDER_VALUE_RANGE_BONUS)
            }
            (Some(_), Some(_)) => Err(Ineligibility::OrderValueOutOfRange),
            _ => Ok(0),
        },
        RateKind::DistanceBased(tier) => measured_range(
            tier.min_distance,
            tier.max_distance,
            ctx.distance,
            DISTANCE_RANGE_BONUS,
            Ineligibility::MissingDistance,
            Ineligibility::DistanceOutOfRange,
        ),
        RateKind::FlatRate | RateKind::ItemBased(_) | RateKind::Free => Ok(0),
    }
}

fn measured_range(
    min: Option<f64>,
    max: Option<f64>,
    value: Option<f64>,
    bonus: i32,
    missing: Ineligibility,
    out_of_range: Ineligibility,
) -> Result<i32, Ineligibility> {
    let (Some(min), Some(max)) = (min, max) else {
        return Ok(0);
    };
    let value = value.ok_or(missing)?;
    if value >= min && value <= max {
        Ok(bonus)
    } else {
        Err(out_of_range)
    }
}

fn intersects<T: PartialEq>(configured: &[T], present: &[T]) -> bool {
    configured.iter().any(|id| present.contains(id))
}
