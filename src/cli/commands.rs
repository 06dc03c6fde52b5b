//! CLI command definitions

use crate::types::CarrierTier;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "carrier-sales")]
#[command(about = "Carrier Sales - bounded rate negotiation for inbound carrier calls", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a single negotiation round
    Evaluate {
        /// JSON request file, or `-` for stdin
        #[arg(short, long, conflicts_with_all = ["load_id", "listed_rate", "carrier_offer"])]
        request: Option<PathBuf>,

        /// Load identifier
        #[arg(long, required_unless_present = "request")]
        load_id: Option<String>,

        /// Posted rate of the load
        #[arg(long, required_unless_present = "request")]
        listed_rate: Option<Decimal>,

        /// Carrier's offer this round
        #[arg(long, required_unless_present = "request")]
        carrier_offer: Option<Decimal>,

        /// Negotiation round (1-based)
        #[arg(long, default_value = "1")]
        round: u32,

        #[command(flatten)]
        load: LoadArgs,

        /// Our previous counter offer
        #[arg(long)]
        last_offer: Option<Decimal>,
    },

    /// Run a whole negotiation against scripted carrier offers
    Simulate {
        /// Load identifier
        #[arg(long, default_value = "SIM-1")]
        load_id: String,

        /// Posted rate of the load
        #[arg(long)]
        listed_rate: Decimal,

        /// Carrier offers, one per round (comma separated)
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        offers: Vec<Decimal>,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Print the effective negotiation policy
    Policy,
}

/// Load attributes that shape the cap and acceptance floor
#[derive(clap::Args, Debug, Clone)]
pub struct LoadArgs {
    /// Trip distance in miles
    #[arg(long)]
    pub miles: Option<Decimal>,

    /// Equipment label (e.g. "reefer", "flatbed")
    #[arg(long)]
    pub equipment_type: Option<String>,

    /// Carrier tier (gold, silver, standard, bronze)
    #[arg(long, default_value = "standard")]
    pub tier: CarrierTier,
}
