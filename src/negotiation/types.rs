//! Negotiation request, decision and session record types

use crate::types::{CarrierTier, LoadId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

fn first_round() -> u32 {
    1
}

/// One round of a carrier negotiation, as posted by the voice agent.
///
/// Amounts are read from the JSON number text, not through `f64`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegotiationRequest {
    pub load_id: LoadId,
    /// Posted, carrier-facing rate of the load
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub listed_rate: Decimal,
    /// Amount the carrier proposed this round
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub carrier_offer: Decimal,
    #[serde(default = "first_round")]
    pub round: u32,
    #[serde(
        default,
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub miles: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub tier: CarrierTier,
    /// Our previous counter, echoed back by the caller from round 2 on
    #[serde(
        default,
        alias = "our_offer",
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_offer: Option<Decimal>,
}

impl NegotiationRequest {
    pub fn new(load_id: LoadId, listed_rate: Decimal, carrier_offer: Decimal, round: u32) -> Self {
        Self {
            load_id,
            listed_rate,
            carrier_offer,
            round,
            miles: None,
            equipment_type: None,
            tier: CarrierTier::default(),
            last_offer: None,
        }
    }

    pub fn with_last_offer(mut self, last_offer: Decimal) -> Self {
        self.last_offer = Some(last_offer);
        self
    }

    pub fn with_miles(mut self, miles: Decimal) -> Self {
        self.miles = Some(miles);
        self
    }

    pub fn with_equipment_type(mut self, equipment_type: impl Into<String>) -> Self {
        self.equipment_type = Some(equipment_type.into());
        self
    }

    pub fn with_tier(mut self, tier: CarrierTier) -> Self {
        self.tier = tier;
        self
    }
}

/// Outcome of a single round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Counter,
    Reject,
}

impl Decision {
    /// Accept and reject end the negotiation
    pub fn is_terminal(&self) -> bool {
        matches!(self, Decision::Accept | Decision::Reject)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Accept => f.write_str("accept"),
            Decision::Counter => f.write_str("counter"),
            Decision::Reject => f.write_str("reject"),
        }
    }
}

/// Engine answer for one round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegotiationDecision {
    pub decision: Decision,
    /// Agreed rate on accept, our counter on counter, absent on reject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_offer: Option<Decimal>,
    pub round: u32,
    /// The stable cap this round was decided against
    pub cap: Decimal,
    /// Set on the take-it-or-leave-it counter of the last round
    #[serde(default)]
    pub final_offer: bool,
    pub rationale: String,
}

/// Telemetry record of one evaluated round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub load_id: LoadId,
    pub listed_rate: Decimal,
    pub our_offer: Option<Decimal>,
    pub carrier_offer: Decimal,
    pub decision: Decision,
    pub next_offer: Option<Decimal>,
    pub cap: Decimal,
}

/// How a negotiation session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Rate agreed, load booked
    Booked,
    /// Carrier refused our final offer
    Declined,
    /// Rounds exhausted without agreement
    Rejected,
    InProgress,
}

/// Summary handed to the telemetry collaborator once a call ends
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub load_id: LoadId,
    pub outcome: OutcomeKind,
    pub final_rate: Option<Decimal>,
    pub rounds: u32,
}
