//! Carrier Sales CLI binary

use anyhow::Context;
use carrier_sales::cli::{CarrierSalesApp, Cli, Commands};
use carrier_sales::config::{AppConfig, LogFormat, LoggingConfig};
use carrier_sales::negotiation::{NegotiationRequest, NegotiationSession};
use carrier_sales::types::LoadId;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(&config.logging);
    tracing::debug!(level = %config.logging.level, format = %config.logging.format, "Logging initialized");

    let app = CarrierSalesApp::new(&config)?;

    match cli.command {
        Commands::Evaluate {
            request,
            load_id,
            listed_rate,
            carrier_offer,
            round,
            load,
            last_offer,
        } => {
            let request = match request {
                Some(path) => CarrierSalesApp::read_request(&path)
                    .with_context(|| format!("failed to read request from {}", path.display()))?,
                None => {
                    // clap enforces these when no request file is given
                    let (Some(load_id), Some(listed_rate), Some(carrier_offer)) =
                        (load_id, listed_rate, carrier_offer)
                    else {
                        anyhow::bail!("--load-id, --listed-rate and --carrier-offer are required");
                    };

                    NegotiationRequest {
                        load_id: LoadId::new(load_id),
                        listed_rate,
                        carrier_offer,
                        round,
                        miles: load.miles,
                        equipment_type: load.equipment_type,
                        tier: load.tier,
                        last_offer,
                    }
                }
            };

            tracing::info!("Evaluating round {} for load {}", request.round, request.load_id);
            let decision = app.evaluate(&request)?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }

        Commands::Simulate {
            load_id,
            listed_rate,
            offers,
            load,
        } => {
            let mut session =
                NegotiationSession::new(LoadId::new(load_id), listed_rate).with_tier(load.tier);
            if let Some(miles) = load.miles {
                session = session.with_miles(miles);
            }
            if let Some(equipment_type) = load.equipment_type {
                session = session.with_equipment_type(equipment_type);
            }

            tracing::info!("Simulating {} carrier offers", offers.len());
            let report = app.simulate(session, &offers)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Policy => {
            print!("{}", app.policy_toml()?);
        }
    }

    Ok(())
}
