//! Fuzz target for oracle quorum matching.
//!
//! Feeds arbitrary report sequences into `quorum::record_response` and
//! checks:
//! - a request resolves exactly when one code collects `quorum` reports
//! - the resolved code is the one that crossed the quorum
//! - an oracle is counted once per round
//! - reopening discards earlier reports

#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use flight_oracle::quorum::{self, Submission};
use flight_oracle::{StatusCode, StatusRequest};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address, Env, Map, String};

const MAX_ORACLES: usize = 24;
const MAX_REPORTS: usize = 128;

const CODES: [StatusCode; 6] = [
    StatusCode::Unknown,
    StatusCode::OnTime,
    StatusCode::LateAirline,
    StatusCode::LateWeather,
    StatusCode::LateTechnical,
    StatusCode::LateOther,
];

#[derive(Arbitrary, Debug)]
enum Step {
    Report { oracle: u8, code: u8 },
    Reopen { index: u8 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    oracles: u8,
    quorum: u8,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    let env = Env::default();
    let oracle_count = 1 + input.oracles as usize % MAX_ORACLES;
    let quorum = 1 + u32::from(input.quorum) % 5;
    let oracles: Vec<Address> = (0..oracle_count).map(|_| Address::generate(&env)).collect();

    let mut request = StatusRequest {
        flight: String::from_str(&env, "ND1309"),
        timestamp: 1_700_000_000,
        requester: Address::generate(&env),
        index: 0,
        round: 1,
        responses: Map::new(&env),
        tally: Map::new(&env),
        resolved: None,
        opened_at: 0,
    };

    let mut reported: BTreeMap<usize, u32> = BTreeMap::new();
    let mut tally: BTreeMap<u32, u32> = BTreeMap::new();

    for step in input.steps.iter().take(MAX_REPORTS) {
        match *step {
            Step::Reopen { index } => {
                let round = request.round;
                quorum::reopen(&env, &mut request, u32::from(index) % 10);
                assert_eq!(request.round, round + 1);
                assert!(request.responses.is_empty());
                assert!(request.tally.is_empty());
                reported.clear();
                tally.clear();
            }
            Step::Report { oracle, code } => {
                let slot = oracle as usize % oracle_count;
                let status = CODES[code as usize % CODES.len()];
                let outcome =
                    quorum::record_response(&mut request, &oracles[slot], status, quorum);

                if reported.contains_key(&slot) {
                    assert_eq!(outcome, Submission::Duplicate);
                    continue;
                }
                reported.insert(slot, status.code());

                let matching = tally.entry(status.code()).or_insert(0);
                *matching += 1;

                if *matching >= quorum {
                    assert_eq!(outcome, Submission::Resolved(status));
                    assert_eq!(request.resolved, Some(status));
                    // callers stop feeding a resolved request
                    return;
                }
                assert_eq!(outcome, Submission::Recorded { matching: *matching });
                assert_eq!(request.resolved, None);
            }
        }

        assert_eq!(request.responses.len() as usize, reported.len());
        for (code, count) in tally.iter() {
            assert_eq!(request.tally.get(*code), Some(*count));
        }
    }
});
