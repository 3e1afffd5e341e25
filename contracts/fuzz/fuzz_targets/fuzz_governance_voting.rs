//! Fuzz target for operational-mode voting.
//!
//! Drives `set_operating_status` with arbitrary sequences of admin and
//! outsider votes and checks every result against a reference model:
//! - only registered admins can vote
//! - an admin counts once per proposal
//! - the mode flips exactly when half the admins (rounded up) agree
//! - a flip clears both ballots

#![no_main]

use std::collections::BTreeSet;

use airline_governance::{
    voting, AirlineGovernance, AirlineGovernanceClient, GovernanceConfig, GovernanceError,
    DEFAULT_CONSENSUS_FLOOR, DEFAULT_FUNDING_THRESHOLD,
};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address, Env, String};

const MAX_ADMINS: usize = 8;
const MAX_VOTES: usize = 64;

#[derive(Arbitrary, Debug)]
struct Vote {
    voter: u8,
    mode: bool,
}

#[derive(Arbitrary, Debug)]
struct Input {
    extra_admins: u8,
    votes: Vec<Vote>,
}

fuzz_target!(|input: Input| {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(AirlineGovernance, ());
    let client = AirlineGovernanceClient::new(&env, &contract_id);
    client.initialize(
        &owner,
        &String::from_str(&env, "Airline0"),
        &Address::generate(&env),
        &GovernanceConfig {
            asset: token,
            vault: Address::generate(&env),
            funding_threshold: DEFAULT_FUNDING_THRESHOLD,
            consensus_floor: DEFAULT_CONSENSUS_FLOOR,
        },
    );

    let mut admins = vec![owner];
    for _ in 0..(input.extra_admins as usize % MAX_ADMINS) {
        let admin = Address::generate(&env);
        client.register_admin(&admin);
        admins.push(admin);
    }
    let outsider = Address::generate(&env);
    let required = voting::majority(admins.len() as u32) as usize;

    let mut mode = true;
    let mut ballots: [BTreeSet<usize>; 2] = [BTreeSet::new(), BTreeSet::new()];

    for vote in input.votes.iter().take(MAX_VOTES) {
        let slot = vote.voter as usize % (admins.len() + 1);
        let voter = admins.get(slot).unwrap_or(&outsider);
        let result = client.try_set_operating_status(voter, &vote.mode);

        if slot == admins.len() {
            assert_eq!(result, Err(Ok(GovernanceError::NotEligibleVoter)));
            continue;
        }
        if vote.mode == mode {
            assert_eq!(result, Err(Ok(GovernanceError::ModeUnchanged)));
            continue;
        }

        let ballot = &mut ballots[vote.mode as usize];
        if !ballot.insert(slot) {
            assert_eq!(result, Err(Ok(GovernanceError::DuplicateVote)));
            continue;
        }

        if ballot.len() >= required {
            assert_eq!(result, Ok(Ok(true)));
            mode = vote.mode;
            ballots = [BTreeSet::new(), BTreeSet::new()];
        } else {
            assert_eq!(result, Ok(Ok(false)));
        }

        assert_eq!(client.is_operational(), mode);
    }
});
