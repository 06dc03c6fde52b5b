//! Core types used throughout carrier-sales

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a posted load
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadId(pub String);

impl LoadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Carrier standing as reported by carrier verification
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum CarrierTier {
    Gold,
    Silver,
    #[default]
    Standard,
    Bronze,
}

impl CarrierTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarrierTier::Gold => "gold",
            CarrierTier::Silver => "silver",
            CarrierTier::Standard => "standard",
            CarrierTier::Bronze => "bronze",
        }
    }
}

impl fmt::Display for CarrierTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarrierTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(CarrierTier::Gold),
            "silver" => Ok(CarrierTier::Silver),
            "standard" | "" => Ok(CarrierTier::Standard),
            "bronze" => Ok(CarrierTier::Bronze),
            other => Err(format!(
                "unsupported carrier tier `{other}` (expected gold|silver|standard|bronze)"
            )),
        }
    }
}

impl TryFrom<String> for CarrierTier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Normalize a free-form category label: trimmed, lowercase, single spaces.
///
/// `"  Step   Deck "` and `"step deck"` name the same equipment.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Truncate a currency amount to whole cents.
///
/// Truncation (toward zero) keeps a computed counter from rounding past the
/// ceiling it was clamped to.
pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}
