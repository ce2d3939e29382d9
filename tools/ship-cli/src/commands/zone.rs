//! Zone lookup command.

use anyhow::Result;

use super::ZoneArgs;
use crate::context::Context;

/// Run the zone command.
pub async fn run(args: ZoneArgs, ctx: &Context) -> Result<()> {
    let snapshot = ctx.load_catalog(args.catalog.as_deref())?;
    let address = args.address.to_address();
    let engine = ctx.engine(snapshot);

    let zone = engine.find_zone_for_address(&address).await?;

    if ctx.output.is_json() {
        ctx.output.json(&zone);
        return Ok(());
    }

    let Some(zone) = zone else {
        ctx.output
            .warn(&format!("No active zone covers {}", address.one_line()));
        return Ok(());
    };

    ctx.output.success(&format!(
        "{} falls in zone '{}' ({})",
        address.one_line(),
        zone.name,
        zone.id
    ));
    ctx.output.kv("type", zone.zone_type.as_str());
    ctx.output.kv("priority", &zone.priority.to_string());
    if !zone.countries.is_empty() {
        ctx.output.kv("countries", &zone.countries.join(", "));
    }
    if !zone.states.is_empty() {
        ctx.output.kv("states", &zone.states.join(", "));
    }
    if !zone.cities.is_empty() {
        ctx.output.kv("cities", &zone.cities.join(", "));
    }
    if !zone.postal_codes.is_empty() {
        ctx.output.kv("postal codes", &zone.postal_codes.join(", "));
    }

    Ok(())
}
