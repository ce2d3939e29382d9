//! Shipping zones.

use crate::ids::ZoneId;
use crate::model::default_true;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of geography a zone describes.
///
/// Informational except for [`ZoneType::Custom`], which matches every
/// address regardless of its filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Country,
    State,
    City,
    PostalCode,
    Custom,
}

impl ZoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Country => "country",
            ZoneType::State => "state",
            ZoneType::City => "city",
            ZoneType::PostalCode => "postal_code",
            ZoneType::Custom => "custom",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geography filter bundle used to restrict method availability.
///
/// Each filter list left empty leaves that dimension unrestricted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingZone {
    pub id: ZoneId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub zone_type: ZoneType,
    /// Country codes (e.g. "US").
    #[serde(default)]
    pub countries: Vec<String>,
    /// State/province codes (e.g. "CA").
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub postal_codes: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Lower values are checked first.
    #[serde(default)]
    pub priority: i32,
}

impl ShippingZone {
    /// Create an active, unrestricted zone.
    pub fn new(id: impl Into<ZoneId>, name: impl Into<String>, zone_type: ZoneType) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            slug: slugify(&name),
            name,
            zone_type,
            countries: Vec::new(),
            states: Vec::new(),
            cities: Vec::new(),
            postal_codes: Vec::new(),
            is_active: true,
            priority: 0,
        }
    }

    pub fn with_countries(mut self, countries: &[&str]) -> Self {
        self.countries = to_owned(countries);
        self
    }

    pub fn with_states(mut self, states: &[&str]) -> Self {
        self.states = to_owned(states);
        self
    }

    pub fn with_cities(mut self, cities: &[&str]) -> Self {
        self.cities = to_owned(cities);
        self
    }

    pub fn with_postal_codes(mut self, postal_codes: &[&str]) -> Self {
        self.postal_codes = to_owned(postal_codes);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub(crate) fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
