//! In-memory catalog backed by a snapshot file.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CatalogError, CatalogResult, ShippingCatalog};
use crate::ids::MethodId;
use crate::model::{ShippingMethod, ShippingRate, ShippingZone};

/// A full export of zones, methods and rates.
///
/// ```toml
/// [[zones]]
/// id = "us"
/// name = "United States"
/// zone_type = "country"
/// countries = ["US"]
///
/// [[methods]]
/// id = "standard"
/// name = "Standard"
/// is_default = true
///
/// [[rates]]
/// id = "standard-flat"
/// method_id = "standard"
/// rate_type = "flat_rate"
/// base_rate = 5.99
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub zones: Vec<ShippingZone>,
    #[serde(default)]
    pub methods: Vec<ShippingMethod>,
    #[serde(default)]
    pub rates: Vec<ShippingRate>,
}

impl CatalogSnapshot {
    pub fn from_toml_str(content: &str) -> CatalogResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Unavailable(format!("failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }
}

/// Serves a [`CatalogSnapshot`] with the ordering the engine expects.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    snapshot: CatalogSnapshot,
}

impl InMemoryCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn add_zone(&mut self, zone: ShippingZone) {
        self.snapshot.zones.push(zone);
    }

    pub fn add_method(&mut self, method: ShippingMethod) {
        self.snapshot.methods.push(method);
    }

    pub fn add_rate(&mut self, rate: ShippingRate) {
        self.snapshot.rates.push(rate);
    }
}

impl From<CatalogSnapshot> for InMemoryCatalog {
    fn from(snapshot: CatalogSnapshot) -> Self {
        Self::new(snapshot)
    }
}

#[async_trait]
impl ShippingCatalog for InMemoryCatalog {
    async fn list_active_methods(&self) -> CatalogResult<Vec<ShippingMethod>> {
        let mut methods: Vec<ShippingMethod> = self
            .snapshot
            .methods
            .iter()
            .filter(|method| method.is_active)
            .cloned()
            .collect();
        methods.sort_by_key(|method| method.priority);
        Ok(methods)
    }

    async fn list_active_rates(&self, method_id: &MethodId) -> CatalogResult<Vec<ShippingRate>> {
        let mut rates: Vec<ShippingRate> = self
            .snapshot
            .rates
            .iter()
            .filter(|rate| rate.is_active && &rate.method_id == method_id)
            .cloned()
            .collect();
        rates.sort_by_key(|rate| rate.base_rate);
        Ok(rates)
    }

    async fn find_method(&self, id: &MethodId) -> CatalogResult<Option<ShippingMethod>> {
        Ok(self
            .snapshot
            .methods
            .iter()
            .find(|method| &method.id == id)
            .cloned())
    }

    async fn list_active_zones(&self) -> CatalogResult<Vec<ShippingZone>> {
        let mut zones: Vec<ShippingZone> = self
            .snapshot
            .zones
            .iter()
            .filter(|zone| zone.is_active)
            .cloned()
            .collect();
        zones.sort_by_key(|zone| zone.priority);
        Ok(zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RateKind, ZoneType};
    use crate::money::Money;

    fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::default();
        catalog.add_method(ShippingMethod::new("express", "Express").with_priority(2));
        catalog.add_method(ShippingMethod::new("standard", "Standard").with_priority(1));
        catalog.add_method(ShippingMethod::new("retired", "Retired").inactive());
        catalog.add_rate(ShippingRate::new(
            "b",
            "standard",
            RateKind::FlatRate,
            Money::from_decimal(9.0),
        ));
        catalog.add_rate(ShippingRate::new(
            "a",
            "standard",
            RateKind::FlatRate,
            Money::from_decimal(4.0),
        ));
        let mut disabled =
            ShippingRate::new("c", "standard", RateKind::FlatRate, Money::from_decimal(1.0));
        disabled.is_active = false;
        catalog.add_rate(disabled);
        catalog.add_rate(ShippingRate::new(
            "x",
            "express",
            RateKind::FlatRate,
            Money::from_decimal(2.0),
        ));
        catalog
    }

    #[tokio::test]
    async fn test_methods_are_active_and_ordered_by_priority() {
        let methods = catalog().list_active_methods().await.unwrap();
        let ids: Vec<&str> = methods.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["standard", "express"]);
    }

    #[tokio::test]
    async fn test_rates_are_scoped_active_and_ordered_by_base_rate() {
        let rates = catalog()
            .list_active_rates(&MethodId::new("standard"))
            .await
            .unwrap();
        let ids: Vec<&str> = rates.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_find_method_includes_inactive() {
        let found = catalog()
            .find_method(&MethodId::new("retired"))
            .await
            .unwrap();
        assert!(found.is_some_and(|m| !m.is_active));
        assert!(catalog()
            .find_method(&MethodId::new("nope"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_zones_filtered_and_sorted() {
        let mut catalog = InMemoryCatalog::default();
        catalog.add_zone(ShippingZone::new("z2", "Second", ZoneType::Custom).with_priority(5));
        catalog.add_zone(ShippingZone::new("z1", "First", ZoneType::Custom).with_priority(1));
        let mut off = ShippingZone::new("z0", "Off", ZoneType::Custom);
        off.is_active = false;
        catalog.add_zone(off);

        let zones = catalog.list_active_zones().await.unwrap();
        let ids: Vec<&str> = zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["z1", "z2"]);
    }

    #[test]
    fn test_snapshot_from_toml() {
        let snapshot = CatalogSnapshot::from_toml_str(
            r#"
            [[zones]]
            id = "us"
            name = "United States"
            zone_type = "country"
            countries = ["US"]

            [[methods]]
            id = "standard"
            name = "Standard"
            zone_id = "us"
            is_default = true

            [[rates]]
            id = "standard-flat"
            method_id = "standard"
            rate_type = "flat_rate"
            base_rate = 5.99
            valid_to = "2030-01-01T00:00:00Z"
            "#,
        )
        .unwrap();

        assert_eq!(snapshot.zones.len(), 1);
        assert!(snapshot.methods[0].is_default);
        assert_eq!(snapshot.rates[0].base_rate, Money::new(599));
        assert!(snapshot.rates[0].valid_to.is_some());
    }

    #[test]
    fn test_snapshot_decode_error() {
        let err = CatalogSnapshot::from_json_str("{\"rates\": [{\"id\": 1}]}").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }
}
