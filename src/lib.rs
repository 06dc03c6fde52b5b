//! Carrier Sales negotiation library
//!
//! Backend pieces for a voice agent that books inbound freight-carrier
//! calls:
//! - a pure, round-limited negotiation engine (accept, counter or reject)
//! - the tunable policy behind it (concession schedule, stable cap, floors)
//! - a caller-side session that threads round and last offer between calls
//! - configuration and CLI wiring

pub mod cli;
pub mod config;
pub mod error;
pub mod negotiation;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{CarrierSalesError, Result};
pub use negotiation::{
    Decision, NegotiationDecision, NegotiationEngine, NegotiationPolicy, NegotiationRequest,
    NegotiationSession, SessionOutcome,
};
pub use types::{CarrierTier, LoadId};
