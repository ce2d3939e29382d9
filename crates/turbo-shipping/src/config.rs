//! Engine configuration.
//!
//! Loaded from the `[engine]` table of a TOML file (or the `engine` key of a
//! JSON file):
//!
//! ```toml
//! [engine]
//! default_item_weight = 0.5
//! holiday_dates = ["2026-12-25", "2027-01-01"]
//! ```

use crate::error::{ShippingError, ShippingResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weight assumed for an item that does not declare one.
pub const DEFAULT_ITEM_WEIGHT: f64 = 0.5;

/// Tunables for deriving an order context from a checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Per-unit weight used when a checkout item omits its weight.
    #[serde(default = "default_item_weight")]
    pub default_item_weight: f64,

    /// Dates treated as holidays when a checkout does not say either way.
    #[serde(default)]
    pub holiday_dates: Vec<NaiveDate>,
}

fn default_item_weight() -> f64 {
    DEFAULT_ITEM_WEIGHT
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_item_weight: DEFAULT_ITEM_WEIGHT,
            holiday_dates: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    engine: EngineConfig,
}

impl EngineConfig {
    /// Parse the `[engine]` table from TOML text. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> ShippingResult<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.engine.validated()
    }

    /// Parse the `engine` object from JSON text.
    pub fn from_json_str(content: &str) -> ShippingResult<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;
        file.engine.validated()
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> ShippingResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShippingError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Render as a TOML document with an `[engine]` table.
    pub fn to_toml_string(&self) -> ShippingResult<String> {
        toml::to_string_pretty(&ConfigFile {
            engine: self.clone(),
        })
        .map_err(|e| ShippingError::Config(e.to_string()))
    }

    /// Whether `date` is a configured holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_dates.contains(&date)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> ShippingResult<()> {
        if !self.default_item_weight.is_finite() || self.default_item_weight < 0.0 {
            return Err(ShippingError::Config(format!(
                "default_item_weight must be a non-negative number, got {}",
                self.default_item_weight
            )));
        }
        Ok(())
    }

    fn validated(self) -> ShippingResult<Self> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.default_item_weight, 0.5);
    }

    #[test]
    fn test_engine_table() {
        let config = EngineConfig::from_toml_str(
            r#"
            [engine]
            default_item_weight = 1.0
            holiday_dates = ["2026-12-25"]
            "#,
        )
        .unwrap();

        assert_eq!(config.default_item_weight, 1.0);
        assert!(config.is_holiday(NaiveDate::from_ymd_opt(2026, 12, 25).unwrap()));
        assert!(!config.is_holiday(NaiveDate::from_ymd_opt(2026, 12, 24).unwrap()));
    }

    #[test]
    fn test_json_config() {
        let config =
            EngineConfig::from_json_str(r#"{"engine": {"default_item_weight": 0.25}}"#).unwrap();
        assert_eq!(config.default_item_weight, 0.25);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = EngineConfig::from_toml_str("[engine]\ndefault_item_weight = -1.0").unwrap_err();
        assert!(matches!(err, ShippingError::Config(_)));
    }

    #[test]
    fn test_toml_round_trip_keeps_holidays() {
        let config = EngineConfig {
            default_item_weight: 0.75,
            holiday_dates: vec![NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()],
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[engine]"));
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
