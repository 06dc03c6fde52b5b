//! Carrier sales application wiring the engine to CLI input

use crate::config::AppConfig;
use crate::error::{CarrierSalesError, Result};
use crate::negotiation::{
    NegotiationDecision, NegotiationEngine, NegotiationRequest, NegotiationSession, RoundRecord,
    SessionOutcome,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Result of a scripted negotiation run
#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    pub rounds: Vec<RoundRecord>,
    pub outcome: SessionOutcome,
}

/// Main carrier sales application
#[derive(Clone, Debug)]
pub struct CarrierSalesApp {
    engine: NegotiationEngine,
}

impl CarrierSalesApp {
    /// Create the application from loaded configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let engine = NegotiationEngine::new(config.negotiation.clone())?;
        tracing::info!(
            max_rounds = engine.policy().max_rounds,
            round_overflow = %engine.policy().round_overflow,
            "Negotiation engine ready"
        );
        Ok(Self { engine })
    }

    /// Get negotiation engine
    pub fn engine(&self) -> &NegotiationEngine {
        &self.engine
    }

    /// Evaluate one round
    pub fn evaluate(&self, request: &NegotiationRequest) -> Result<NegotiationDecision> {
        self.engine.evaluate(request)
    }

    /// Read a JSON request from a file, or stdin for `-`
    pub fn read_request(path: &Path) -> Result<NegotiationRequest> {
        let body = if path == Path::new("-") {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            body
        } else {
            std::fs::read_to_string(path)?
        };

        Ok(serde_json::from_str(&body)?)
    }

    /// Play scripted carrier offers against a session until it closes or
    /// the offers run out.
    ///
    /// A carrier that has no offer left after our final counter is taken to
    /// have refused it.
    pub fn simulate(
        &self,
        mut session: NegotiationSession,
        offers: &[Decimal],
    ) -> Result<SimulationReport> {
        let mut last_was_final = false;

        for offer in offers {
            if session.is_closed() {
                tracing::debug!(load_id = %session.load_id(), "Session closed, ignoring remaining offers");
                break;
            }
            let decision = session.submit(&self.engine, *offer)?;
            last_was_final = decision.final_offer;
        }

        if !session.is_closed() && last_was_final {
            session.walk_away()?;
            tracing::info!(load_id = %session.load_id(), "Carrier refused the final offer");
        }

        Ok(SimulationReport {
            rounds: session.records().to_vec(),
            outcome: session.outcome(),
        })
    }

    /// Render the policy in force as TOML
    pub fn policy_toml(&self) -> Result<String> {
        toml::to_string_pretty(self.engine.policy())
            .map_err(|e| CarrierSalesError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiation::{Decision, OutcomeKind};
    use crate::types::LoadId;
    use std::io::Write;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn app() -> CarrierSalesApp {
        CarrierSalesApp::new(&AppConfig::default()).unwrap()
    }

    #[test]
    fn test_app_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.negotiation.max_rounds = 0;
        assert!(CarrierSalesApp::new(&config).is_err());
    }

    #[test]
    fn test_read_request_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"load_id": "L-7", "listed_rate": 1500, "carrier_offer": 1300, "round": 1}}"#
        )
        .unwrap();

        let request = CarrierSalesApp::read_request(file.path()).unwrap();
        let decision = app().evaluate(&request).unwrap();
        assert_eq!(decision.decision, Decision::Counter);
    }

    #[test]
    fn test_read_malformed_request() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"load_id": "L-7"}}"#).unwrap();

        let result = CarrierSalesApp::read_request(file.path());
        assert!(matches!(result, Err(CarrierSalesError::Json(_))));
    }

    #[test]
    fn test_simulate_books_load() {
        let session = NegotiationSession::new(LoadId::new("L-9"), dec("1500"));
        let report = app()
            .simulate(session, &[dec("1200"), dec("1540"), dec("1560")])
            .unwrap();

        // Second offer clears our standing counter; the third is never played
        assert_eq!(report.rounds.len(), 2);
        assert_eq!(report.outcome.outcome, OutcomeKind::Booked);
        assert_eq!(report.outcome.final_rate, Some(dec("1540")));
    }

    #[test]
    fn test_simulate_refused_final_offer_is_declined() {
        let session = NegotiationSession::new(LoadId::new("L-9"), dec("1500"));
        let report = app()
            .simulate(session, &[dec("1200"), dec("1200"), dec("1200")])
            .unwrap();

        assert_eq!(report.rounds.len(), 3);
        assert_eq!(report.rounds[2].next_offer, Some(dec("1575")));
        assert_eq!(report.outcome.outcome, OutcomeKind::Declined);
    }

    #[test]
    fn test_simulate_short_script_stays_open() {
        let session = NegotiationSession::new(LoadId::new("L-9"), dec("1500"));
        let report = app().simulate(session, &[dec("1200")]).unwrap();

        assert_eq!(report.outcome.outcome, OutcomeKind::InProgress);
        assert_eq!(report.outcome.rounds, 1);
    }

    #[test]
    fn test_policy_toml_parses_back() {
        let rendered = app().policy_toml().unwrap();
        let policy: crate::negotiation::NegotiationPolicy = toml::from_str(&rendered).unwrap();
        assert_eq!(&policy, app().engine().policy());
    }
}
