//! Bounded rate negotiation for inbound carrier calls

pub mod engine;
pub mod policy;
pub mod session;
pub mod types;

pub use engine::NegotiationEngine;
pub use policy::{MileageBand, NegotiationPolicy, RoundOverflow};
pub use session::NegotiationSession;
pub use types::{
    Decision, NegotiationDecision, NegotiationRequest, OutcomeKind, RoundRecord, SessionOutcome,
};
