//! Caller-side negotiation session
//!
//! The engine keeps no state between rounds. A `NegotiationSession` plays the
//! voice agent's part: it remembers the load, the round we are in and our
//! last counter, feeds them back into every request and keeps the per-round
//! records the telemetry collaborator needs once the call ends.

use crate::error::{CarrierSalesError, Result};
use crate::types::{CarrierTier, LoadId};
use rust_decimal::Decimal;

use super::engine::NegotiationEngine;
use super::types::{
    Decision, NegotiationDecision, NegotiationRequest, OutcomeKind, RoundRecord, SessionOutcome,
};

/// A negotiation over one load within one call
#[derive(Clone, Debug)]
pub struct NegotiationSession {
    load_id: LoadId,
    listed_rate: Decimal,
    miles: Option<Decimal>,
    equipment_type: Option<String>,
    tier: CarrierTier,
    round: u32,
    last_offer: Option<Decimal>,
    records: Vec<RoundRecord>,
    outcome: OutcomeKind,
    final_rate: Option<Decimal>,
}

impl NegotiationSession {
    /// Create a session for a load at its listed rate
    pub fn new(load_id: LoadId, listed_rate: Decimal) -> Self {
        Self {
            load_id,
            listed_rate,
            miles: None,
            equipment_type: None,
            tier: CarrierTier::default(),
            round: 1,
            last_offer: None,
            records: Vec::new(),
            outcome: OutcomeKind::InProgress,
            final_rate: None,
        }
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

    /// Get load ID
    pub fn load_id(&self) -> &LoadId {
        &self.load_id
    }

    /// Round the next submission will be evaluated as
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Our latest counter, if any
    pub fn last_offer(&self) -> Option<Decimal> {
        self.last_offer
    }

    /// Get all evaluated rounds
    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    /// Check if negotiation has ended
    pub fn is_closed(&self) -> bool {
        self.outcome != OutcomeKind::InProgress
    }

    /// Request the engine would see for a carrier offer this round
    pub fn request_for(&self, carrier_offer: Decimal) -> NegotiationRequest {
        NegotiationRequest {
            load_id: self.load_id.clone(),
            listed_rate: self.listed_rate,
            carrier_offer,
            round: self.round,
            miles: self.miles,
            equipment_type: self.equipment_type.clone(),
            tier: self.tier,
            last_offer: self.last_offer,
        }
    }

    /// Evaluate the carrier's latest offer and advance the session
    pub fn submit(
        &mut self,
        engine: &NegotiationEngine,
        carrier_offer: Decimal,
    ) -> Result<NegotiationDecision> {
        if self.is_closed() {
            return Err(CarrierSalesError::SessionClosed(self.load_id.0.clone()));
        }

        let request = self.request_for(carrier_offer);
        let decision = engine.evaluate(&request)?;

        self.records.push(RoundRecord {
            round: decision.round,
            load_id: self.load_id.clone(),
            listed_rate: self.listed_rate,
            our_offer: self.last_offer,
            carrier_offer,
            decision: decision.decision,
            next_offer: decision.next_offer,
            cap: decision.cap,
        });

        match decision.decision {
            Decision::Accept => {
                self.outcome = OutcomeKind::Booked;
                self.final_rate = decision.next_offer;
            }
            Decision::Reject => {
                self.outcome = OutcomeKind::Rejected;
            }
            Decision::Counter => {
                self.last_offer = decision.next_offer;
                self.round += 1;
            }
        }

        tracing::info!(
            load_id = %self.load_id,
            round = decision.round,
            decision = %decision.decision,
            "Negotiation round evaluated"
        );

        Ok(decision)
    }

    /// Close the session after the carrier refused our counter
    pub fn walk_away(&mut self) -> Result<()> {
        if self.is_closed() {
            return Err(CarrierSalesError::SessionClosed(self.load_id.0.clone()));
        }

        self.outcome = OutcomeKind::Declined;
        Ok(())
    }

    /// Summary for the telemetry collaborator
    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            load_id: self.load_id.clone(),
            outcome: self.outcome,
            final_rate: self.final_rate,
            rounds: self.records.len() as u32,
        }
    }
}
