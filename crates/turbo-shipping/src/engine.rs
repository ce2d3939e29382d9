//! Shipping options for a checkout.
//!
//! For every active method the engine loads its rates, picks the best one
//! for the order and prices it. Methods without an eligible rate are left
//! out of the result; that is a normal outcome, not an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::checkout::{CheckoutRequest, OrderContext, ShippingAddress};
use crate::config::EngineConfig;
use crate::cost::{CostBreakdown, CostCalculator};
use crate::error::{ShippingError, ShippingResult};
use crate::ids::{MethodId, RateId};
use crate::matching::{MatchObserver, NoopObserver, RateMatcher, ZoneMatcher};
use crate::model::{RateType, ShippingMethod, ShippingRate, ShippingZone};
use crate::money::Money;
use crate::store::ShippingCatalog;

/// A priced shipping choice presented at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub method_id: MethodId,
    pub method_name: String,
    pub rate_id: RateId,
    pub rate_type: RateType,
    pub total_cost: Money,
    pub breakdown: CostBreakdown,
    pub estimated_days: Option<String>,
    pub is_default: bool,
    pub requires_signature: bool,
    pub is_insured: bool,
    pub insurance_amount: Money,
}

impl ShippingOption {
    fn new(
        method: &ShippingMethod,
        rate: &ShippingRate,
        breakdown: CostBreakdown,
        total_cost: Money,
    ) -> Self {
        Self {
            method_id: method.id.clone(),
            method_name: method.name.clone(),
            rate_id: rate.id.clone(),
            rate_type: rate.rate_type(),
            total_cost,
            breakdown,
            estimated_days: method.estimated_days.clone(),
            is_default: method.is_default,
            requires_signature: method.requires_signature,
            is_insured: method.is_insured,
            insurance_amount: method.insurance_amount,
        }
    }
}

/// Computes shipping options against a catalog.
pub struct ShippingEngine<C: ShippingCatalog> {
    catalog: Arc<C>,
    config: EngineConfig,
    observer: Arc<dyn MatchObserver>,
}

impl<C: ShippingCatalog> ShippingEngine<C> {
    /// Create an engine with default configuration.
    pub fn new(catalog: C) -> Self {
        Self::from_shared(Arc::new(catalog))
    }

    /// Create an engine over a catalog shared with other components.
    pub fn from_shared(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            config: EngineConfig::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Report rate evaluations and pricing to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn MatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// All available options, cheapest first.
    pub async fn calculate_options(
        &self,
        checkout: &CheckoutRequest,
    ) -> ShippingResult<Vec<ShippingOption>> {
        self.calculate_options_at(checkout, Utc::now()).await
    }

    /// [`calculate_options`](Self::calculate_options) as of `now`.
    ///
    /// Methods are not filtered by the destination's zone here; use
    /// [`validate_method_for_address`](Self::validate_method_for_address)
    /// for that.
    #[instrument(skip_all, fields(items = checkout.items.len()))]
    pub async fn calculate_options_at(
        &self,
        checkout: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> ShippingResult<Vec<ShippingOption>> {
        let ctx = self.order_context(checkout, now)?;
        let methods = self.catalog.list_active_methods().await?;

        let rate_sets = try_join_all(
            methods
                .iter()
                .map(|method| self.catalog.list_active_rates(&method.id)),
        )
        .await?;

        let mut options: Vec<ShippingOption> = methods
            .iter()
            .zip(rate_sets.iter())
            .filter_map(|(method, rates)| self.price_method(method, rates, &ctx, now))
            .collect();

        // Stable: equal totals keep method priority order.
        options.sort_by_key(|option| option.total_cost);

        info!(
            methods = methods.len(),
            options = options.len(),
            "calculated shipping options"
        );
        Ok(options)
    }

    /// Price one method for a checkout.
    ///
    /// Unknown ids are an error; an inactive method or one without an
    /// eligible rate yields `None`.
    pub async fn get_cost_for_method(
        &self,
        method_id: &MethodId,
        checkout: &CheckoutRequest,
    ) -> ShippingResult<Option<ShippingOption>> {
        self.get_cost_for_method_at(method_id, checkout, Utc::now())
            .await
    }

    #[instrument(skip(self, checkout, now), fields(method = %method_id))]
    pub async fn get_cost_for_method_at(
        &self,
        method_id: &MethodId,
        checkout: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> ShippingResult<Option<ShippingOption>> {
        let ctx = self.order_context(checkout, now)?;

        let method = self
            .catalog
            .find_method(method_id)
            .await?
            .ok_or_else(|| ShippingError::MethodNotFound(method_id.clone()))?;

        if !method.is_active {
            debug!("method is inactive");
            return Ok(None);
        }

        let rates = self.catalog.list_active_rates(&method.id).await?;
        Ok(self.price_method(&method, &rates, &ctx, now))
    }

    /// Option for the method flagged as default, if any.
    pub async fn get_default_option(
        &self,
        checkout: &CheckoutRequest,
    ) -> ShippingResult<Option<ShippingOption>> {
        self.get_default_option_at(checkout, Utc::now()).await
    }

    pub async fn get_default_option_at(
        &self,
        checkout: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> ShippingResult<Option<ShippingOption>> {
        checkout.validate()?;

        let methods = self.catalog.list_active_methods().await?;
        let Some(default) = methods.into_iter().find(|method| method.is_default) else {
            debug!("no default shipping method configured");
            return Ok(None);
        };

        self.get_cost_for_method_at(&default.id, checkout, now)
            .await
    }

    /// Whether a method may ship to `address`.
    #[instrument(skip(self, address), fields(method = %method_id))]
    pub async fn validate_method_for_address(
        &self,
        method_id: &MethodId,
        address: &ShippingAddress,
    ) -> ShippingResult<bool> {
        let method = self
            .catalog
            .find_method(method_id)
            .await?
            .ok_or_else(|| ShippingError::MethodNotFound(method_id.clone()))?;

        if method.is_global() {
            return Ok(true);
        }

        let zones = self.catalog.list_active_zones().await?;
        let valid = ZoneMatcher::validate_method_for_address(&method, &zones, address);
        debug!(valid, zone = ?method.zone_id, "validated method for address");
        Ok(valid)
    }

    /// First active zone, by priority, containing `address`.
    pub async fn find_zone_for_address(
        &self,
        address: &ShippingAddress,
    ) -> ShippingResult<Option<ShippingZone>> {
        let zones = self.catalog.list_active_zones().await?;
        Ok(ZoneMatcher::find_matching_zone(&zones, address).cloned())
    }

    fn order_context(
        &self,
        checkout: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> ShippingResult<OrderContext> {
        OrderContext::from_checkout(checkout, &self.config, now.date_naive())
    }

    fn price_method(
        &self,
        method: &ShippingMethod,
        rates: &[ShippingRate],
        ctx: &OrderContext,
        now: DateTime<Utc>,
    ) -> Option<ShippingOption> {
        let matcher = RateMatcher::with_observer(self.observer.as_ref());

        let Some(selection) = matcher.select_best_rate(rates, ctx, now) else {
            debug!(method = %method.id, candidates = rates.len(), "no eligible rate");
            return None;
        };

        let (breakdown, total) = CostCalculator::quote(selection.rate, ctx);
        self.observer.rate_priced(selection.rate, &breakdown, total);

        debug!(
            method = %method.id,
            rate = %selection.rate.id,
            score = selection.score,
            total = %total,
            "selected rate"
        );

        Some(ShippingOption::new(method, selection.rate, breakdown, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutItem;
    use crate::matching::RecordingObserver;
    use crate::model::{ItemTier, RateKind, WeightTier, ZoneType};
    use crate::store::{CatalogError, CatalogResult, InMemoryCatalog};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    fn money(amount: f64) -> Money {
        Money::from_decimal(amount)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 9, 30, 0).unwrap()
    }

    fn address(state: &str) -> ShippingAddress {
        ShippingAddress::new("US", state, "Springfield", "12345")
    }

    fn checkout(items: u32, unit_weight: f64, value: f64) -> CheckoutRequest {
        CheckoutRequest::new(
            vec![CheckoutItem::new("widget", items, money(value / items as f64))
                .with_weight(unit_weight)],
            address("CA"),
            money(value),
        )
    }

    fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::default();
        catalog.add_zone(
            ShippingZone::new("west", "US West", ZoneType::State)
                .with_countries(&["US"])
                .with_states(&["CA", "OR"]),
        );

        catalog.add_method(
            ShippingMethod::new("standard", "Standard")
                .with_priority(1)
                .with_estimated_days("3-5")
                .as_default(),
        );
        catalog.add_method(ShippingMethod::new("express", "Express").with_priority(2));
        catalog.add_method(
            ShippingMethod::new("local", "Local courier")
                .with_priority(3)
                .in_zone("west"),
        );
        catalog.add_method(ShippingMethod::new("freight", "Freight").with_priority(4));

        catalog.add_rate(
            ShippingRate::new("standard-items", "standard", RateKind::ItemBased(ItemTier {
                first_item_count: 3,
                additional_item_rate: money(1.99),
                max_items: None,
            }), money(4.99)),
        );
        catalog.add_rate(ShippingRate::new(
            "express-flat",
            "express",
            RateKind::FlatRate,
            money(14.99),
        ));
        catalog.add_rate(ShippingRate::new(
            "local-flat",
            "local",
            RateKind::FlatRate,
            money(2.5),
        ));
        catalog.add_rate(ShippingRate::new(
            "freight-heavy",
            "freight",
            RateKind::WeightBased(WeightTier {
                min_weight: Some(50.0),
                max_weight: Some(500.0),
                weight_unit: Some(10.0),
                additional_rate: money(5.0),
            }),
            money(40.0),
        ));
        catalog
    }

    fn engine() -> ShippingEngine<InMemoryCatalog> {
        ShippingEngine::new(catalog())
    }

    #[tokio::test]
    async fn test_options_sorted_by_total_and_unmatched_methods_skipped() {
        let options = engine()
            .calculate_options_at(&checkout(4, 1.0, 60.0), now())
            .await
            .unwrap();

        let ids: Vec<&str> = options.iter().map(|o| o.method_id.as_str()).collect();
        // freight has no rate for 4kg.
        assert_eq!(ids, vec!["local", "standard", "express"]);

        let totals: Vec<Money> = options.iter().map(|o| o.total_cost).collect();
        assert_eq!(totals, vec![money(2.5), money(6.98), money(14.99)]);
        assert!(totals.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test]
    async fn test_option_carries_method_details() {
        let options = engine()
            .calculate_options_at(&checkout(1, 1.0, 20.0), now())
            .await
            .unwrap();
        let standard = options
            .iter()
            .find(|o| o.method_id.as_str() == "standard")
            .unwrap();

        assert_eq!(standard.rate_id.as_str(), "standard-items");
        assert_eq!(standard.rate_type, RateType::ItemBased);
        assert_eq!(standard.estimated_days.as_deref(), Some("3-5"));
        assert!(standard.is_default);
        assert_eq!(standard.total_cost, standard.breakdown.total());
    }

    #[tokio::test]
    async fn test_zoned_methods_are_not_filtered_by_address() {
        let mut request = checkout(1, 1.0, 20.0);
        request.shipping_address = Some(address("NY"));

        let options = engine().calculate_options_at(&request, now()).await.unwrap();
        assert!(options.iter().any(|o| o.method_id.as_str() == "local"));
    }

    #[tokio::test]
    async fn test_heavy_order_reaches_freight() {
        let options = engine()
            .calculate_options_at(&checkout(6, 20.0, 300.0), now())
            .await
            .unwrap();
        let freight = options
            .iter()
            .find(|o| o.method_id.as_str() == "freight")
            .unwrap();

        // 120kg: ceil((120 - 50) / 10) = 7 steps
        assert_eq!(freight.breakdown.additional_cost, money(35.0));
        assert_eq!(freight.total_cost, money(75.0));
    }

    #[tokio::test]
    async fn test_cost_for_method() {
        let option = engine()
            .get_cost_for_method_at(&MethodId::new("standard"), &checkout(10, 0.2, 80.0), now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(option.total_cost, money(18.92));

        let none = engine()
            .get_cost_for_method_at(&MethodId::new("freight"), &checkout(1, 1.0, 20.0), now())
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_cost_for_unknown_method_is_not_found() {
        let err = engine()
            .get_cost_for_method_at(&MethodId::new("teleport"), &checkout(1, 1.0, 20.0), now())
            .await
            .unwrap_err();
        assert!(matches!(err, ShippingError::MethodNotFound(id) if id.as_str() == "teleport"));
    }

    #[tokio::test]
    async fn test_cost_for_inactive_method_is_none() {
        let mut catalog = catalog();
        catalog.add_method(ShippingMethod::new("paused", "Paused").inactive());
        catalog.add_rate(ShippingRate::new("paused-flat", "paused", RateKind::FlatRate, money(1.0)));

        let option = ShippingEngine::new(catalog)
            .get_cost_for_method_at(&MethodId::new("paused"), &checkout(1, 1.0, 20.0), now())
            .await
            .unwrap();
        assert!(option.is_none());
    }

    #[tokio::test]
    async fn test_default_option() {
        let option = engine()
            .get_default_option_at(&checkout(2, 1.0, 30.0), now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(option.method_id.as_str(), "standard");
        assert_eq!(option.total_cost, money(4.99));

        let mut catalog = InMemoryCatalog::default();
        catalog.add_method(ShippingMethod::new("only", "Only"));
        let none = ShippingEngine::new(catalog)
            .get_default_option_at(&checkout(2, 1.0, 30.0), now())
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_validate_method_for_address() {
        let engine = engine();

        assert!(engine
            .validate_method_for_address(&MethodId::new("standard"), &address("NY"))
            .await
            .unwrap());
        assert!(engine
            .validate_method_for_address(&MethodId::new("local"), &address("OR"))
            .await
            .unwrap());
        assert!(!engine
            .validate_method_for_address(&MethodId::new("local"), &address("NY"))
            .await
            .unwrap());
        assert!(engine
            .validate_method_for_address(&MethodId::new("missing"), &address("CA"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_find_zone_for_address() {
        let zone = engine().find_zone_for_address(&address("OR")).await.unwrap();
        assert_eq!(zone.unwrap().id.as_str(), "west");
        assert!(engine()
            .find_zone_for_address(&address("TX"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_validation_happens_before_matching() {
        let mut request = checkout(1, 1.0, 20.0);
        request.order_value = Money::ZERO;

        let err = ShippingEngine::new(FailingCatalog)
            .calculate_options_at(&request, now())
            .await
            .unwrap_err();
        assert!(matches!(err, ShippingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_catalog_errors_propagate() {
        let err = ShippingEngine::new(FailingCatalog)
            .calculate_options_at(&checkout(1, 1.0, 20.0), now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShippingError::Catalog(CatalogError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_rate_falls_back_to_next() {
        let mut catalog = InMemoryCatalog::default();
        catalog.add_method(ShippingMethod::new("promo", "Promo"));
        catalog.add_rate(
            ShippingRate::new("gone", "promo", RateKind::Free, Money::ZERO)
                .valid_between(None, Some(now() - Duration::days(2))),
        );
        catalog.add_rate(ShippingRate::new("regular", "promo", RateKind::FlatRate, money(7.0)));

        let options = ShippingEngine::new(catalog)
            .calculate_options_at(&checkout(1, 1.0, 20.0), now())
            .await
            .unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].rate_id.as_str(), "regular");
    }

    #[tokio::test]
    async fn test_observer_records_priced_rates() {
        let observer = Arc::new(RecordingObserver::new());
        let engine = engine().with_observer(observer.clone());

        engine
            .calculate_options_at(&checkout(4, 1.0, 60.0), now())
            .await
            .unwrap();

        let traces = observer.traces_for(&MethodId::new("standard"));
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].total, Some(money(6.98)));

        let freight = observer.traces_for(&MethodId::new("freight"));
        assert!(!freight[0].evaluation.is_eligible());
        assert!(freight[0].breakdown.is_none());
    }

    #[tokio::test]
    async fn test_configured_holiday_applies_when_checkout_is_silent() {
        let mut catalog = InMemoryCatalog::default();
        catalog.add_method(ShippingMethod::new("std", "Standard"));
        catalog.add_rate(ShippingRate::new("regular", "std", RateKind::FlatRate, money(3.0)));
        catalog.add_rate(
            ShippingRate::new("holiday", "std", RateKind::FlatRate, money(9.0)).holiday_only(),
        );
        let config = EngineConfig {
            holiday_dates: vec![now().date_naive()],
            ..EngineConfig::default()
        };
        let engine = ShippingEngine::new(catalog).with_config(config);

        let options = engine
            .calculate_options_at(&checkout(1, 1.0, 20.0), now())
            .await
            .unwrap();
        assert_eq!(options[0].rate_id.as_str(), "holiday");

        let regular_day = checkout(1, 1.0, 20.0).on_holiday(false);
        let options = engine.calculate_options_at(&regular_day, now()).await.unwrap();
        assert_eq!(options[0].rate_id.as_str(), "regular");
    }

    struct FailingCatalog;

    #[async_trait]
    impl ShippingCatalog for FailingCatalog {
        async fn list_active_methods(&self) -> CatalogResult<Vec<ShippingMethod>> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }

        async fn list_active_rates(&self, _method_id: &MethodId) -> CatalogResult<Vec<ShippingRate>> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }

        async fn find_method(&self, _id: &MethodId) -> CatalogResult<Option<ShippingMethod>> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }

        async fn list_active_zones(&self) -> CatalogResult<Vec<ShippingZone>> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
    }
}
