//! Method/address validation command.

use anyhow::{bail, Result};
use serde_json::json;
use turbo_shipping::MethodId;

use super::ValidateArgs;
use crate::context::Context;

/// Run the validate command.
pub async fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let snapshot = ctx.load_catalog(args.catalog.as_deref())?;
    let address = args.address.to_address();
    let method_id = MethodId::new(args.method.as_str());
    let engine = ctx.engine(snapshot);

    let valid = engine
        .validate_method_for_address(&method_id, &address)
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "methodId": method_id,
            "address": address,
            "valid": valid,
        }));
        return Ok(());
    }

    if !valid {
        bail!(
            "Method '{}' does not ship to {}",
            method_id,
            address.one_line()
        );
    }

    ctx.output.success(&format!(
        "Method '{}' ships to {}",
        method_id,
        address.one_line()
    ));

    Ok(())
}
