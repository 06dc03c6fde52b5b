//! Tunable negotiation policy: concession schedule, cap adjustments and
//! acceptance floors.

use crate::error::{CarrierSalesError, Result};
use crate::types::{normalize_label, to_cents, CarrierTier};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Rounds a session may take before the engine stops countering
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// Upper bound accepted for `max_rounds`
pub const MAX_ALLOWED_ROUNDS: u32 = 10;

/// Floor used for a tier missing from `tier_floors`
pub const DEFAULT_TIER_FLOOR: Decimal = Decimal::from_parts(88, 0, 0, false, 2);

/// What a round past `max_rounds` produces
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundOverflow {
    /// Negotiation is exhausted: answer with a `reject` decision
    #[default]
    Reject,
    /// Treat the round as a malformed request
    Error,
}

impl fmt::Display for RoundOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundOverflow::Reject => f.write_str("reject"),
            RoundOverflow::Error => f.write_str("error"),
        }
    }
}

impl FromStr for RoundOverflow {
    type Err = CarrierSalesError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(RoundOverflow::Reject),
            "error" => Ok(RoundOverflow::Error),
            other => Err(CarrierSalesError::InvalidConfig(format!(
                "unsupported round overflow policy `{other}` (expected reject|error)"
            ))),
        }
    }
}

/// Extra cap headroom granted to loads at or beyond a distance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MileageBand {
    pub min_miles: Decimal,
    pub premium: Decimal,
}

/// Policy constants behind every negotiation decision.
///
/// Field order matters for TOML output: plain values first, tables last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NegotiationPolicy {
    /// Last round in which the engine still counters
    pub max_rounds: u32,
    /// Fraction of the remaining gap to the cap conceded in each round
    pub concession_schedule: Vec<Decimal>,
    /// Headroom above the listed rate every cap carries
    pub base_headroom: Decimal,
    /// Share of the listed rate an offer must reach before the final round
    pub acceptance_ratio: Decimal,
    pub round_overflow: RoundOverflow,
    /// Share of the listed rate an offer must reach, per carrier tier
    pub tier_floors: BTreeMap<CarrierTier, Decimal>,
    /// Extra cap headroom keyed by normalized equipment label
    pub equipment_premiums: BTreeMap<String, Decimal>,
    pub mileage_bands: Vec<MileageBand>,
}

impl Default for NegotiationPolicy {
    fn default() -> Self {
        let tier_floors = BTreeMap::from([
            (CarrierTier::Gold, Decimal::new(93, 2)),
            (CarrierTier::Silver, Decimal::new(90, 2)),
            (CarrierTier::Standard, DEFAULT_TIER_FLOOR),
            (CarrierTier::Bronze, Decimal::new(87, 2)),
        ]);

        let equipment_premiums = BTreeMap::from([
            ("reefer".to_string(), Decimal::new(4, 2)),
            ("flatbed".to_string(), Decimal::new(3, 2)),
            ("step deck".to_string(), Decimal::new(3, 2)),
            ("power only".to_string(), Decimal::new(2, 2)),
        ]);

        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            concession_schedule: vec![Decimal::new(35, 2), Decimal::new(25, 2), Decimal::new(20, 2)],
            base_headroom: Decimal::new(5, 2),
            acceptance_ratio: Decimal::new(90, 2),
            round_overflow: RoundOverflow::Reject,
            tier_floors,
            equipment_premiums,
            mileage_bands: vec![
                MileageBand {
                    min_miles: Decimal::from(500),
                    premium: Decimal::new(1, 2),
                },
                MileageBand {
                    min_miles: Decimal::from(1000),
                    premium: Decimal::new(2, 2),
                },
            ],
        }
    }
}

impl NegotiationPolicy {
    /// Check every constant is in range
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 || self.max_rounds > MAX_ALLOWED_ROUNDS {
            return Err(invalid(format!(
                "max_rounds must be within 1..={MAX_ALLOWED_ROUNDS}, got {}",
                self.max_rounds
            )));
        }

        if self.concession_schedule.is_empty() {
            return Err(invalid("concession_schedule must not be empty".to_string()));
        }
        for rate in &self.concession_schedule {
            if *rate <= Decimal::ZERO || *rate > Decimal::ONE {
                return Err(invalid(format!(
                    "concession rates must be within (0, 1], got {rate}"
                )));
            }
        }
        if self.concession_schedule.windows(2).any(|pair| pair[1] > pair[0]) {
            return Err(invalid(
                "concession_schedule must not increase from one round to the next".to_string(),
            ));
        }

        check_fraction("base_headroom", self.base_headroom)?;

        if self.acceptance_ratio <= Decimal::ZERO || self.acceptance_ratio > Decimal::ONE {
            return Err(invalid(format!(
                "acceptance_ratio must be within (0, 1], got {}",
                self.acceptance_ratio
            )));
        }

        for (tier, floor) in &self.tier_floors {
            if *floor <= Decimal::ZERO || *floor > Decimal::ONE {
                return Err(invalid(format!(
                    "tier floor for {tier} must be within (0, 1], got {floor}"
                )));
            }
        }

        for (label, premium) in &self.equipment_premiums {
            if *label != normalize_label(label) || label.is_empty() {
                return Err(invalid(format!(
                    "equipment label `{label}` must be lowercase with single spaces"
                )));
            }
            check_fraction(&format!("equipment premium for `{label}`"), *premium)?;
        }

        for band in &self.mileage_bands {
            if band.min_miles < Decimal::ZERO {
                return Err(invalid(format!(
                    "mileage band min_miles must not be negative, got {}",
                    band.min_miles
                )));
            }
            check_fraction("mileage band premium", band.premium)?;
        }
        if self
            .mileage_bands
            .windows(2)
            .any(|pair| pair[1].min_miles <= pair[0].min_miles)
        {
            return Err(invalid(
                "mileage_bands must be sorted by strictly increasing min_miles".to_string(),
            ));
        }

        Ok(())
    }

    /// Fraction of the gap to the cap conceded in `round` (1-based)
    pub fn concession_rate(&self, round: u32) -> Decimal {
        let index = (round.max(1) as usize - 1).min(self.concession_schedule.len().saturating_sub(1));
        self.concession_schedule
            .get(index)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Acceptance floor for a carrier tier, as a share of the listed rate
    pub fn tier_floor(&self, tier: CarrierTier) -> Decimal {
        self.tier_floors
            .get(&tier)
            .copied()
            .unwrap_or(DEFAULT_TIER_FLOOR)
    }

    /// Cap headroom granted for an equipment label; unknown labels get none
    pub fn equipment_premium(&self, equipment_type: Option<&str>) -> Decimal {
        equipment_type
            .map(normalize_label)
            .and_then(|label| self.equipment_premiums.get(&label).copied())
            .unwrap_or(Decimal::ZERO)
    }

    /// Cap headroom of the farthest mileage band the load reaches
    pub fn mileage_premium(&self, miles: Option<Decimal>) -> Decimal {
        let Some(miles) = miles else {
            return Decimal::ZERO;
        };

        self.mileage_bands
            .iter()
            .filter(|band| band.min_miles <= miles)
            .last()
            .map(|band| band.premium)
            .unwrap_or(Decimal::ZERO)
    }

    /// The stable cap: the highest rate the engine will concede to.
    ///
    /// Pure in its inputs, truncated to cents and never below `listed_rate`.
    /// A listed rate too large to carry the headroom is invalid input.
    pub fn stable_cap(
        &self,
        listed_rate: Decimal,
        miles: Option<Decimal>,
        equipment_type: Option<&str>,
    ) -> Result<Decimal> {
        let multiplier = Decimal::ONE
            + self.base_headroom
            + self.equipment_premium(equipment_type)
            + self.mileage_premium(miles);

        let cap = listed_rate.checked_mul(multiplier).ok_or_else(|| {
            CarrierSalesError::InvalidInput(format!(
                "listed_rate {listed_rate} is too large to price"
            ))
        })?;

        Ok(to_cents(cap).max(listed_rate))
    }
}

fn invalid(message: String) -> CarrierSalesError {
    CarrierSalesError::InvalidConfig(message)
}

fn check_fraction(name: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
    }
    Ok(())
}
