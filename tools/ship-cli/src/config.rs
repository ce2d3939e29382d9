//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_shipping::EngineConfig;

/// CLI configuration file (`ship.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Engine tunables.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Catalog location.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };

        config
            .engine
            .validate()
            .with_context(|| format!("Invalid engine settings in {}", path))?;

        Ok(config.relative_to(Path::new(path).parent()))
    }

    /// Resolve a relative catalog path against the config file's directory.
    fn relative_to(mut self, dir: Option<&Path>) -> Self {
        if let (Some(dir), Some(catalog)) = (dir, self.catalog.path.as_ref()) {
            if Path::new(catalog).is_relative() && !dir.as_os_str().is_empty() {
                self.catalog.path = Some(dir.join(catalog).to_string_lossy().into_owned());
            }
        }
        self
    }
}

/// Where the catalog snapshot lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Snapshot used when a command gets no `--catalog`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset (default: warn).
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Generate a default ship.toml config file.
pub fn generate_default_config() -> String {
    r#"# Shipping engine configuration

[engine]
# Weight (kg) assumed for items that do not declare one.
default_item_weight = 0.5
# Checkouts on these dates are priced as holidays unless they say otherwise.
holiday_dates = []

[catalog]
# path = "catalog.toml"

[log]
level = "warn"
"#
    .to_string()
}
