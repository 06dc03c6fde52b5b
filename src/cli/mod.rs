//! CLI module for carrier-sales

pub mod app;
pub mod commands;

pub use app::{CarrierSalesApp, SimulationReport};
pub use commands::{Cli, Commands, LoadArgs};
