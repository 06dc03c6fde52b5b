//! Negotiation engine decides a single round of a carrier negotiation

use crate::error::{CarrierSalesError, Result};
use crate::types::to_cents;
use rust_decimal::Decimal;

use super::policy::{NegotiationPolicy, RoundOverflow};
use super::types::{Decision, NegotiationDecision, NegotiationRequest};

/// Stateless, round-limited pricing policy.
///
/// The engine holds nothing but its policy: the caller threads the round
/// number and our previous counter through each request. Identical requests
/// always produce identical decisions, and the engine is safe to share
/// across threads.
#[derive(Clone, Debug, Default)]
pub struct NegotiationEngine {
    policy: NegotiationPolicy,
}

impl NegotiationEngine {
    /// Create an engine after validating its policy
    pub fn new(policy: NegotiationPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Get the policy in force
    pub fn policy(&self) -> &NegotiationPolicy {
        &self.policy
    }

    /// Decide one round: accept the carrier's offer, counter, or reject
    pub fn evaluate(&self, request: &NegotiationRequest) -> Result<NegotiationDecision> {
        if let Err(e) = self.check_input(request) {
            tracing::warn!(load_id = %request.load_id, round = request.round, "Rejected negotiation request: {}", e);
            return Err(e);
        }

        let policy = &self.policy;
        let round = request.round;
        let cap = policy.stable_cap(
            request.listed_rate,
            request.miles,
            request.equipment_type.as_deref(),
        )?;

        if round > policy.max_rounds {
            return match policy.round_overflow {
                RoundOverflow::Reject => {
                    tracing::debug!(load_id = %request.load_id, round, "Negotiation exhausted");
                    Ok(NegotiationDecision {
                        decision: Decision::Reject,
                        next_offer: None,
                        round,
                        cap,
                        final_offer: false,
                        rationale: format!(
                            "negotiation exhausted after {} rounds",
                            policy.max_rounds
                        ),
                    })
                }
                RoundOverflow::Error => Err(CarrierSalesError::OutOfRangeRound {
                    round,
                    max: policy.max_rounds,
                }),
            };
        }

        let previous = self.previous_offer(request, cap)?;
        let is_final = round == policy.max_rounds;

        let threshold = self.acceptance_threshold(request, is_final)?;
        if request.carrier_offer >= threshold && request.carrier_offer <= cap {
            tracing::debug!(
                load_id = %request.load_id,
                round,
                %cap,
                offer = %request.carrier_offer,
                "Accepting carrier offer"
            );
            return Ok(NegotiationDecision {
                decision: Decision::Accept,
                next_offer: Some(request.carrier_offer),
                round,
                cap,
                final_offer: is_final,
                rationale: format!("offer meets acceptance threshold {}", threshold.round_dp(2)),
            });
        }

        let (next_offer, rationale) = if is_final {
            (cap, "final round: holding at the cap".to_string())
        } else {
            let rate = policy.concession_rate(round);
            let step = (cap - previous)
                .checked_mul(rate)
                .ok_or_else(|| overflow("concession step"))?;
            let counter = to_cents(previous + step).max(previous).min(cap);
            let percent = (rate * Decimal::ONE_HUNDRED).normalize();
            (counter, format!("conceded {percent}% of the gap to the cap"))
        };

        tracing::debug!(
            load_id = %request.load_id,
            round,
            %cap,
            %previous,
            %next_offer,
            final_offer = is_final,
            "Countering carrier offer"
        );

        Ok(NegotiationDecision {
            decision: Decision::Counter,
            next_offer: Some(next_offer),
            round,
            cap,
            final_offer: is_final,
            rationale,
        })
    }

    /// Validate request shape before any pricing happens
    fn check_input(&self, request: &NegotiationRequest) -> Result<()> {
        if request.load_id.as_str().trim().is_empty() {
            return Err(CarrierSalesError::InvalidInput(
                "load_id must not be empty".to_string(),
            ));
        }
        check_positive("listed_rate", request.listed_rate)?;
        check_positive("carrier_offer", request.carrier_offer)?;
        if let Some(miles) = request.miles {
            check_positive("miles", miles)?;
        }
        if let Some(last_offer) = request.last_offer.filter(|_| request.round > 1) {
            check_positive("last_offer", last_offer)?;
        }

        if request.round == 0 {
            return Err(CarrierSalesError::OutOfRangeRound {
                round: 0,
                max: self.policy.max_rounds,
            });
        }

        Ok(())
    }

    /// Our standing position: the listed rate in round 1, the echoed
    /// counter afterwards
    fn previous_offer(&self, request: &NegotiationRequest, cap: Decimal) -> Result<Decimal> {
        if request.round == 1 {
            return Ok(request.listed_rate);
        }

        let last_offer = request
            .last_offer
            .ok_or(CarrierSalesError::MissingContext {
                round: request.round,
            })?;

        if last_offer > cap {
            return Err(CarrierSalesError::InvalidInput(format!(
                "last_offer {last_offer} exceeds the cap {cap}"
            )));
        }

        Ok(last_offer)
    }

    /// Lowest carrier offer the engine takes this round.
    ///
    /// Before the final round the offer must reach the stricter of the
    /// acceptance ratio and the tier floor; the final round only needs the
    /// tier floor. An offer below our own standing counter is never taken.
    fn acceptance_threshold(&self, request: &NegotiationRequest, is_final: bool) -> Result<Decimal> {
        let floor = self.policy.tier_floor(request.tier);
        let ratio = if is_final {
            floor
        } else {
            floor.max(self.policy.acceptance_ratio)
        };

        let threshold = request
            .listed_rate
            .checked_mul(ratio)
            .ok_or_else(|| overflow("acceptance threshold"))?;
        Ok(match request.last_offer {
            Some(last_offer) if request.round > 1 => threshold.max(last_offer),
            _ => threshold,
        })
    }
}

fn overflow(what: &str) -> CarrierSalesError {
    CarrierSalesError::InvalidInput(format!("{what} overflows for this request"))
}

fn check_positive(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(CarrierSalesError::InvalidInput(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}
