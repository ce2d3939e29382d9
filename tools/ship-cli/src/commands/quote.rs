//! Checkout quoting command.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use turbo_shipping::matching::{RateTrace, RecordingObserver};
use turbo_shipping::{MethodId, ShippingOption, ShippingResult};

use super::QuoteArgs;
use crate::context::Context;
use crate::output::{evaluation_badge, format_money, yes_no};

/// JSON shape of `quote --explain`.
#[derive(Serialize)]
struct QuoteReport<'a> {
    evaluated_at: DateTime<Utc>,
    options: &'a [ShippingOption],
    traces: Vec<RateTrace>,
}

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let snapshot = ctx.load_catalog(args.catalog.as_deref())?;
    let checkout = ctx.load_checkout(&args.checkout)?;
    let now = parse_instant(args.at.as_deref())?;

    ctx.output.debug(&format!(
        "Catalog: {} zones, {} methods, {} rates",
        snapshot.zones.len(),
        snapshot.methods.len(),
        snapshot.rates.len()
    ));
    ctx.output.debug(&format!("Evaluating at {}", now.to_rfc3339()));

    let observer = Arc::new(RecordingObserver::new());
    let engine = ctx.engine(snapshot).with_observer(observer.clone());

    let spinner = ctx.output.spinner("Pricing checkout...");
    let result: ShippingResult<Vec<ShippingOption>> = if let Some(method) = &args.method {
        engine
            .get_cost_for_method_at(&MethodId::new(method.as_str()), &checkout, now)
            .await
            .map(|option| option.into_iter().collect())
    } else if args.default {
        engine
            .get_default_option_at(&checkout, now)
            .await
            .map(|option| option.into_iter().collect())
    } else {
        engine.calculate_options_at(&checkout, now).await
    };
    spinner.finish_and_clear();
    let options = result?;

    if ctx.output.is_json() {
        if args.explain {
            ctx.output.json(&QuoteReport {
                evaluated_at: now,
                options: &options,
                traces: observer.traces(),
            });
        } else {
            ctx.output.json(&options);
        }
        return Ok(());
    }

    print_options(&options, ctx);

    if args.explain || ctx.output.is_verbose() {
        print_explanation(&observer.traces(), ctx);
    }

    Ok(())
}

fn parse_instant(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(at) => Ok(DateTime::parse_from_rfc3339(at)
            .with_context(|| format!("Invalid --at timestamp: {}", at))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn print_options(options: &[ShippingOption], ctx: &Context) {
    if options.is_empty() {
        ctx.output.warn("No shipping options available for this checkout");
        return;
    }

    ctx.output.header("Shipping Options");
    ctx.output.info("");

    let widths = [20, 20, 14, 8, 10];
    ctx.output
        .table_row(&["METHOD", "RATE", "TYPE", "DAYS", "TOTAL"], &widths);
    ctx.output.table_row(
        &["------", "----", "----", "----", "-----"],
        &widths,
    );

    for option in options {
        let name = if option.is_default {
            format!("{} *", option.method_name)
        } else {
            option.method_name.clone()
        };
        ctx.output.table_row(
            &[
                name.as_str(),
                option.rate_id.as_str(),
                option.rate_type.as_str(),
                option.estimated_days.as_deref().unwrap_or("-"),
                format_money(option.total_cost).as_str(),
            ],
            &widths,
        );
    }

    if options.len() == 1 {
        let option = &options[0];
        ctx.output.info("");
        ctx.output
            .kv("base rate", &format_money(option.breakdown.base_rate));
        ctx.output
            .kv("additional", &format_money(option.breakdown.additional_cost));
        ctx.output
            .kv("handling", &format_money(option.breakdown.handling_fee));
        ctx.output
            .kv("insurance", &format_money(option.breakdown.insurance_fee));
        ctx.output
            .kv("signature", &format_money(option.breakdown.signature_fee));
        ctx.output
            .kv("requires signature", yes_no(option.requires_signature));
        if option.is_insured {
            ctx.output
                .kv("insured up to", &format_money(option.insurance_amount));
        }
    }
}

fn print_explanation(traces: &[RateTrace], ctx: &Context) {
    ctx.output.header("Rate Evaluation");

    let mut current_method: Option<&MethodId> = None;
    for trace in traces {
        if current_method != Some(&trace.method_id) {
            ctx.output.info("");
            ctx.output.info(&format!("[{}]", trace.method_id));
            current_method = Some(&trace.method_id);
        }

        ctx.output.list_item(&format!(
            "{} ({}, base {}): {}",
            trace.rate_id,
            trace.rate_type,
            format_money(trace.base_rate),
            evaluation_badge(&trace.evaluation)
        ));

        if let (Some(breakdown), Some(total)) = (trace.breakdown, trace.total) {
            let sum = breakdown.total();
            ctx.output.kv(
                "    selected",
                &format!(
                    "{} + {} + {} + {} + {} = {}",
                    format_money(breakdown.base_rate),
                    format_money(breakdown.additional_cost),
                    format_money(breakdown.handling_fee),
                    format_money(breakdown.insurance_fee),
                    format_money(breakdown.signature_fee),
                    format_money(total)
                ),
            );
            if sum != total {
                ctx.output.warn(&format!(
                    "{}: breakdown sums to {} but total is {}",
                    trace.rate_id,
                    format_money(sum),
                    format_money(total)
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant() {
        let at = parse_instant(Some("2026-03-15T12:00:00+02:00")).unwrap();
        assert_eq!(at.to_rfc3339(), "2026-03-15T10:00:00+00:00");
        assert!(parse_instant(Some("next tuesday")).is_err());
        assert!(parse_instant(None).is_ok());
    }
}
