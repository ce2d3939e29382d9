//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use dialoguer::Confirm;
use turbo_shipping::store::CatalogSnapshot;

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults, no ship.toml found)"),
    }

    // Engine section
    let engine = &ctx.config.engine;
    ctx.output.info("");
    ctx.output.info("[engine]");
    ctx.output
        .kv("default_item_weight", &engine.default_item_weight.to_string());
    if engine.holiday_dates.is_empty() {
        ctx.output.kv("holiday_dates", "none");
    } else {
        ctx.output.kv("holiday_dates", "");
        for date in &engine.holiday_dates {
            ctx.output.list_item(&date.to_string());
        }
    }

    // Catalog section
    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "path",
        ctx.config.catalog.path.as_deref().unwrap_or("(not set)"),
    );

    // Log section
    ctx.output.info("");
    ctx.output.info("[log]");
    ctx.output.kv("level", &ctx.config.log.level);

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        if ctx.output.is_json() {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            ctx.output.info("Keeping existing config");
            return Ok(());
        }
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if ctx.config_path.is_none() {
        warnings.push("No ship.toml found; using defaults".to_string());
    }

    // Engine settings were checked on load; flag suspicious values
    let engine = &ctx.config.engine;
    if engine.default_item_weight == 0.0 {
        warnings.push(
            "engine.default_item_weight is 0; items without a weight will ship weightless"
                .to_string(),
        );
    }
    let mut dates = engine.holiday_dates.clone();
    dates.sort();
    dates.dedup();
    if dates.len() != engine.holiday_dates.len() {
        warnings.push("engine.holiday_dates contains duplicates".to_string());
    }

    // Catalog must load when configured
    match &ctx.config.catalog.path {
        Some(path) => match CatalogSnapshot::load(ctx.resolve_path(path)) {
            Ok(snapshot) => {
                ctx.output.debug(&format!(
                    "Catalog loaded: {} zones, {} methods, {} rates",
                    snapshot.zones.len(),
                    snapshot.methods.len(),
                    snapshot.rates.len()
                ));
                errors.extend(check_catalog(&snapshot));
            }
            Err(e) => errors.push(format!("catalog.path: {}", e)),
        },
        None => warnings.push("catalog.path is not set".to_string()),
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Referential checks the engine itself does not enforce.
fn check_catalog(snapshot: &CatalogSnapshot) -> Vec<String> {
    let mut errors = Vec::new();

    for method in &snapshot.methods {
        if let Some(zone_id) = &method.zone_id {
            if !snapshot.zones.iter().any(|zone| &zone.id == zone_id) {
                errors.push(format!(
                    "method '{}' references unknown zone '{}'",
                    method.id, zone_id
                ));
            }
        }
    }

    for rate in &snapshot.rates {
        if !snapshot.methods.iter().any(|method| method.id == rate.method_id) {
            errors.push(format!(
                "rate '{}' references unknown method '{}'",
                rate.id, rate.method_id
            ));
        }
    }

    let defaults = snapshot
        .methods
        .iter()
        .filter(|method| method.is_active && method.is_default)
        .count();
    if defaults > 1 {
        errors.push(format!("{} active methods are flagged as default", defaults));
    }

    errors
}
