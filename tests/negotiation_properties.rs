use carrier_sales::negotiation::{
    Decision, NegotiationDecision, NegotiationEngine, NegotiationPolicy, NegotiationRequest,
    RoundOverflow,
};
use carrier_sales::types::{CarrierTier, LoadId};
use carrier_sales::CarrierSalesError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const EQUIPMENT: [&str; 5] = ["Dry Van", "Reefer", "Flatbed", "Step Deck", "Power Only"];
const TIERS: [CarrierTier; 4] = [
    CarrierTier::Gold,
    CarrierTier::Silver,
    CarrierTier::Standard,
    CarrierTier::Bronze,
];

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn cents(rng: &mut StdRng, low: i64, high: i64) -> Decimal {
    Decimal::new(rng.gen_range(low * 100..=high * 100), 2)
}

/// Random first-round request: the load attributes stay fixed for the session
fn random_request(rng: &mut StdRng, id: usize) -> NegotiationRequest {
    let listed_rate = cents(rng, 300, 6000);
    let offer = cents(rng, 100, 7000);
    let mut request = NegotiationRequest::new(LoadId::new(format!("L-{id}")), listed_rate, offer, 1)
        .with_tier(TIERS[rng.gen_range(0..TIERS.len())]);

    if rng.gen_bool(0.5) {
        request = request.with_miles(Decimal::from(rng.gen_range(50..3000)));
    }
    if rng.gen_bool(0.5) {
        request = request.with_equipment_type(EQUIPMENT[rng.gen_range(0..EQUIPMENT.len())]);
    }
    request
}

/// Play a session the way the voice agent does: echo round and last offer,
/// stop on accept or reject
fn play_session(
    engine: &NegotiationEngine,
    rng: &mut StdRng,
    id: usize,
) -> Vec<NegotiationDecision> {
    let mut request = random_request(rng, id);
    let mut decisions = Vec::new();

    loop {
        let decision = engine.evaluate(&request).unwrap();
        let terminal = decision.decision.is_terminal();
        request.last_offer = decision.next_offer;
        decisions.push(decision);
        if terminal {
            break;
        }

        request.round += 1;
        request.carrier_offer = cents(rng, 100, 7000);
    }

    decisions
}

#[test]
fn offers_never_decrease_within_a_session() {
    let engine = NegotiationEngine::default();
    let mut rng = StdRng::seed_from_u64(7);

    for id in 0..500 {
        let offers: Vec<Decimal> = play_session(&engine, &mut rng, id)
            .iter()
            .filter_map(|d| d.next_offer)
            .collect();

        for pair in offers.windows(2) {
            assert!(pair[1] >= pair[0], "session {id}: {offers:?} decreased");
        }
    }
}

#[test]
fn next_offer_never_exceeds_cap() {
    let engine = NegotiationEngine::default();
    let mut rng = StdRng::seed_from_u64(11);

    for id in 0..500 {
        for decision in play_session(&engine, &mut rng, id) {
            if let Some(next_offer) = decision.next_offer {
                assert!(next_offer <= decision.cap, "session {id}: {decision:?}");
            }
        }
    }
}

#[test]
fn sessions_terminate_after_final_round() {
    let engine = NegotiationEngine::default();
    let max_rounds = engine.policy().max_rounds;
    let mut rng = StdRng::seed_from_u64(13);

    for id in 0..500 {
        let decisions = play_session(&engine, &mut rng, id);
        assert!(decisions.len() as u32 <= max_rounds + 1);

        let last = decisions.last().unwrap();
        assert!(last.decision.is_terminal());

        if let Some(final_round) = decisions.iter().find(|d| d.round == max_rounds) {
            match final_round.decision {
                Decision::Accept => {}
                Decision::Counter => {
                    assert!(final_round.final_offer);
                    assert_eq!(final_round.next_offer, Some(final_round.cap));
                }
                Decision::Reject => panic!("session {id}: rejected inside the round limit"),
            }
        }
    }
}

#[test]
fn cap_is_stable_across_a_session() {
    let engine = NegotiationEngine::default();
    let mut rng = StdRng::seed_from_u64(17);

    for id in 0..200 {
        let decisions = play_session(&engine, &mut rng, id);
        let cap = decisions[0].cap;
        assert!(decisions.iter().all(|d| d.cap == cap));
    }
}

#[test]
fn acceptance_holds_in_every_round() {
    let engine = NegotiationEngine::default();

    for round in 1..=3 {
        let mut request = NegotiationRequest::new(LoadId::new("L-1"), dec("1500"), dec("1500"), round);
        if round > 1 {
            request = request.with_last_offer(dec("1500"));
        }

        let decision = engine.evaluate(&request).unwrap();
        assert_eq!(decision.decision, Decision::Accept, "round {round}");
        assert_eq!(decision.next_offer, Some(dec("1500")));
    }
}

#[test]
fn identical_requests_yield_identical_decisions() {
    let engine = NegotiationEngine::default();
    let mut rng = StdRng::seed_from_u64(19);

    for id in 0..200 {
        let request = random_request(&mut rng, id);
        assert_eq!(engine.evaluate(&request).unwrap(), engine.evaluate(&request).unwrap());
    }
}

#[test]
fn concurrent_evaluation_is_deterministic() {
    let engine = NegotiationEngine::default();
    let mut rng = StdRng::seed_from_u64(23);
    let requests: Vec<_> = (0..64).map(|id| random_request(&mut rng, id)).collect();
    let expected: Vec<_> = requests.iter().map(|r| engine.evaluate(r).unwrap()).collect();

    let (engine, requests) = (&engine, &requests);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    requests
                        .iter()
                        .map(|r| engine.evaluate(r).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn first_round_example_counters_below_cap() {
    let engine = NegotiationEngine::default();
    let request = NegotiationRequest::new(LoadId::new("L-1"), dec("1500"), dec("1300"), 1);

    let decision = engine.evaluate(&request).unwrap();
    assert_eq!(decision.decision, Decision::Counter);
    assert!(decision.cap >= dec("1500"));

    let next_offer = decision.next_offer.unwrap();
    assert!(next_offer > dec("1300"));
    assert!(next_offer < decision.cap);
}

#[test]
fn final_round_example_holds_at_cap() {
    let engine = NegotiationEngine::default();
    let request = NegotiationRequest::new(LoadId::new("L-1"), dec("1500"), dec("1300"), 3)
        .with_last_offer(dec("1460"));

    let decision = engine.evaluate(&request).unwrap();
    assert_eq!(decision.decision, Decision::Counter);
    assert_eq!(decision.next_offer, Some(decision.cap));
}

#[test]
fn round_four_is_consistently_rejected() {
    let engine = NegotiationEngine::default();
    let request = NegotiationRequest::new(LoadId::new("L-1"), dec("1500"), dec("1300"), 4)
        .with_last_offer(dec("1575"));

    for _ in 0..3 {
        let decision = engine.evaluate(&request).unwrap();
        assert_eq!(decision.decision, Decision::Reject);
    }

    let strict = NegotiationEngine::new(NegotiationPolicy {
        round_overflow: RoundOverflow::Error,
        ..NegotiationPolicy::default()
    })
    .unwrap();
    let err = strict.evaluate(&request).unwrap_err();
    assert!(err.is_request_error());
    assert!(matches!(err, CarrierSalesError::OutOfRangeRound { round: 4, max: 3 }));
}
