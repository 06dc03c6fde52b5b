//! Error types for carrier-sales

use thiserror::Error;

/// Main error type for carrier-sales
#[derive(Error, Debug)]
pub enum CarrierSalesError {
    // Request errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing context: round {round} requires the previous counter offer")]
    MissingContext { round: u32 },

    #[error("Round out of range: {round} (expected 1..={max})")]
    OutOfRangeRound { round: u32, max: u32 },

    // Session errors
    #[error("Negotiation session closed: {0}")]
    SessionClosed(String),

    // Configuration errors
    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    #[error("Could not parse config file `{path}`: {source}")]
    ConfigParse {
        path: std::path::PathBuf,
        source: toml::de::Error,
    },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CarrierSalesError {
    /// True for errors scoped to a single negotiation request, which the
    /// caller reports back as a bad request.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            CarrierSalesError::InvalidInput(_)
                | CarrierSalesError::MissingContext { .. }
                | CarrierSalesError::OutOfRangeRound { .. }
        )
    }
}

/// Result type alias for carrier-sales operations
pub type Result<T> = std::result::Result<T, CarrierSalesError>;
