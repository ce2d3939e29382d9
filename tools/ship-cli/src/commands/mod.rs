//! CLI command implementations.

pub mod config;
pub mod quote;
pub mod validate;
pub mod zone;

use clap::{Args, Subcommand};
use turbo_shipping::checkout::ShippingAddress;

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Catalog snapshot (TOML or JSON). Defaults to catalog.path from ship.toml.
    #[arg(long)]
    pub catalog: Option<String>,

    /// Checkout request file (JSON or TOML).
    #[arg(long)]
    pub checkout: String,

    /// Quote a single shipping method.
    #[arg(short, long, conflicts_with = "default")]
    pub method: Option<String>,

    /// Quote only the default shipping method.
    #[arg(short, long)]
    pub default: bool,

    /// Evaluate as of this instant (RFC 3339) instead of now.
    #[arg(long)]
    pub at: Option<String>,

    /// Show how every rate was evaluated.
    #[arg(short, long)]
    pub explain: bool,
}

/// Destination address fields.
#[derive(Args)]
pub struct AddressArgs {
    /// Country code (e.g. US).
    #[arg(long)]
    pub country: String,

    /// State or province code.
    #[arg(long, default_value = "")]
    pub state: String,

    /// City.
    #[arg(long, default_value = "")]
    pub city: String,

    /// Postal code.
    #[arg(long, default_value = "")]
    pub postal_code: String,
}

impl AddressArgs {
    pub fn to_address(&self) -> ShippingAddress {
        ShippingAddress::new(
            self.country.as_str(),
            self.state.as_str(),
            self.city.as_str(),
            self.postal_code.as_str(),
        )
    }
}

/// Arguments for the zone command.
#[derive(Args)]
pub struct ZoneArgs {
    /// Catalog snapshot (TOML or JSON).
    #[arg(long)]
    pub catalog: Option<String>,

    #[command(flatten)]
    pub address: AddressArgs,
}

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Catalog snapshot (TOML or JSON).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Shipping method ID.
    #[arg(short, long)]
    pub method: String,

    #[command(flatten)]
    pub address: AddressArgs,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
