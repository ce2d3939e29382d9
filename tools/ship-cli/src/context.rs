//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use turbo_shipping::checkout::CheckoutRequest;
use turbo_shipping::store::{CatalogSnapshot, InMemoryCatalog};
use turbo_shipping::ShippingEngine;

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["ship.toml", ".ship.toml", "ship.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Load the catalog given on the command line, or the configured one.
    pub fn load_catalog(&self, path: Option<&str>) -> Result<CatalogSnapshot> {
        let path = match path.or(self.config.catalog.path.as_deref()) {
            Some(path) => self.resolve_path(path),
            None => bail!("No catalog given. Pass --catalog or set catalog.path in ship.toml."),
        };

        self.output
            .debug(&format!("Loading catalog: {}", path.display()));
        CatalogSnapshot::load(&path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))
    }

    /// Load a checkout request (JSON or TOML).
    pub fn load_checkout(&self, path: &str) -> Result<CheckoutRequest> {
        let path = self.resolve_path(path);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read checkout: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML checkout: {}", path.display()))
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON checkout: {}", path.display()))
        }
    }

    /// Engine over `snapshot` with the configured engine settings.
    pub fn engine(&self, snapshot: CatalogSnapshot) -> ShippingEngine<InMemoryCatalog> {
        ShippingEngine::new(InMemoryCatalog::new(snapshot)).with_config(self.config.engine.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_in(dir: &Path) -> Context {
        Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".ship.toml"), "[log]\nlevel = \"info\"\n").unwrap();

        let (config, path) = Context::find_config(&nested).unwrap();
        assert_eq!(config.log.level, "info");
        assert_eq!(path, root.path().join(".ship.toml"));
    }

    #[test]
    fn test_load_checkout_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("checkout.json"),
            r#"{
                "items": [{"productId": "mug", "quantity": 2, "price": 12.5, "weight": 1.2}],
                "shippingAddress": {"country": "US", "state": "CA"},
                "orderValue": 25.0
            }"#,
        )
        .unwrap();

        let checkout = context_in(dir.path()).load_checkout("checkout.json").unwrap();
        assert_eq!(checkout.items.len(), 1);
        assert_eq!(checkout.items[0].quantity, 2);
        assert!(checkout.validate().is_ok());
    }

    #[test]
    fn test_missing_catalog_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = context_in(dir.path()).load_catalog(None).unwrap_err();
        assert!(err.to_string().contains("--catalog"));
    }
}
