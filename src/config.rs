//! Application configuration: TOML file, then environment overrides

use crate::error::{CarrierSalesError, Result};
use crate::negotiation::NegotiationPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CARRIER_SALES_CONFIG";

/// Config file picked up from the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "carrier-sales.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub negotiation: NegotiationPolicy,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = CarrierSalesError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(CarrierSalesError::InvalidConfig(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Load config from `path` (or the default locations), apply
    /// `CARRIER_SALES_*` overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Path::new(DEFAULT_CONFIG_FILE), read_env)
    }

    /// Same as [`AppConfig::load`] with the default file location and the
    /// variable lookup supplied by the caller
    pub fn load_with<F>(path: Option<&Path>, default_file: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match resolve_config_path(path, default_file, &lookup) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(&lookup)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML config file without overrides or validation
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|source| CarrierSalesError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CARRIER_SALES_MAX_ROUNDS") {
            self.negotiation.max_rounds = value
                .trim()
                .parse()
                .map_err(|_| invalid_override("CARRIER_SALES_MAX_ROUNDS", &value))?;
        }
        if let Some(value) = lookup("CARRIER_SALES_ACCEPTANCE_RATIO") {
            self.negotiation.acceptance_ratio = value
                .trim()
                .parse()
                .map_err(|_| invalid_override("CARRIER_SALES_ACCEPTANCE_RATIO", &value))?;
        }
        if let Some(value) = lookup("CARRIER_SALES_BASE_HEADROOM") {
            self.negotiation.base_headroom = value
                .trim()
                .parse()
                .map_err(|_| invalid_override("CARRIER_SALES_BASE_HEADROOM", &value))?;
        }
        if let Some(value) = lookup("CARRIER_SALES_ROUND_OVERFLOW") {
            self.negotiation.round_overflow = value.parse()?;
        }

        if let Some(value) = lookup("CARRIER_SALES_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = lookup("CARRIER_SALES_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(CarrierSalesError::InvalidConfig(
                "logging.level must not be empty".to_string(),
            ));
        }
        self.negotiation.validate()
    }
}

/// Explicit path first, then `CARRIER_SALES_CONFIG`, then `default_file`
/// when it exists
fn resolve_config_path<F>(explicit: Option<&Path>, default_file: &Path, lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = lookup(CONFIG_PATH_ENV).filter(|value| !value.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }

    default_file.exists().then(|| default_file.to_path_buf())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_override(key: &str, value: &str) -> CarrierSalesError {
    CarrierSalesError::InvalidConfig(format!("invalid environment override for `{key}`: `{value}`"))
}
