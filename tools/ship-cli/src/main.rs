//! Ship CLI - Command line tool for the TurboCommerce shipping engine.
//!
//! Commands:
//! - `ship quote` - Price a checkout against a catalog snapshot
//! - `ship zone` - Find the zone an address falls in
//! - `ship validate` - Check whether a method ships to an address
//! - `ship config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, QuoteArgs, ValidateArgs, ZoneArgs};

/// Ship CLI - Quote and debug shipping rates
#[derive(Parser)]
#[command(name = "ship")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a checkout
    Quote(QuoteArgs),

    /// Find the shipping zone for an address
    Zone(ZoneArgs),

    /// Check a shipping method against an address
    Validate(ValidateArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    init_tracing(cli.verbose, &ctx.config.log.level)?;

    // Execute command
    let result = match cli.command {
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Zone(args) => commands::zone::run(args, &ctx).await,
        Commands::Validate(args) => commands::validate::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose` turns on engine debug events.
fn init_tracing(verbose: bool, configured_level: &str) -> Result<()> {
    let fallback = if verbose {
        "turbo_shipping=debug"
    } else {
        configured_level
    };
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}
