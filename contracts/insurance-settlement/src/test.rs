extern crate std;

use super::*;
use soroban_sdk::{
    contract, contractimpl, symbol_short, testutils::Address as _, token, Address, Env, String,
    Vec,
};

// ----- Mock AirlineGovernance -----

#[contract]
pub struct MockGovernance;

#[contractimpl]
impl MockGovernance {
    pub fn is_operational(env: Env) -> bool {
        !env
            .storage()
            .instance()
            .get(&symbol_short!("paused"))
            .unwrap_or(false)
    }

    /// Test helper: flip the operational flag.
    pub fn set_operational(env: Env, mode: bool) {
        env.storage().instance().set(&symbol_short!("paused"), &!mode);
    }

    pub fn is_flight_registered(env: Env, flight: FlightKey) -> bool {
        env.storage().persistent().has(&flight)
    }

    /// Test helper: mark a flight as registered.
    pub fn register_flight(env: Env, flight: FlightKey) {
        env.storage().persistent().set(&flight, &true);
    }
}

// ----- Mock FlightOracle -----

#[contract]
pub struct MockFlightOracle;

#[contractimpl]
impl MockFlightOracle {
    pub fn resolved_status(env: Env, flight: String, timestamp: u64) -> Option<StatusCode> {
        env.storage().persistent().get(&(flight, timestamp))
    }

    /// Test helper: store the confirmed status for a flight.
    pub fn set_status(env: Env, flight: String, timestamp: u64, status: StatusCode) {
        env.storage().persistent().set(&(flight, timestamp), &status);
    }
}

// ----- Helpers -----

const PREMIUM: i128 = 10_000_000;
const PAYOUT: i128 = 15_000_000;
const DEPARTURE: u64 = 1_700_000_000;

struct Setup {
    env: Env,
    contract_id: Address,
    token: Address,
    oracle: Address,
    governance: Address,
}

impl Setup {
    fn client(&self) -> InsuranceSettlementClient<'_> {
        InsuranceSettlementClient::new(&self.env, &self.contract_id)
    }

    fn oracle(&self) -> MockFlightOracleClient<'_> {
        MockFlightOracleClient::new(&self.env, &self.oracle)
    }

    fn governance(&self) -> MockGovernanceClient<'_> {
        MockGovernanceClient::new(&self.env, &self.governance)
    }

    fn token(&self) -> token::Client<'_> {
        token::Client::new(&self.env, &self.token)
    }

    fn flight(&self, code: &str) -> FlightKey {
        let flight = FlightKey {
            airline: String::from_str(&self.env, "Airline0"),
            code: String::from_str(&self.env, code),
            timestamp: DEPARTURE,
        };
        self.governance().register_flight(&flight);
        flight
    }

    fn passenger(&self) -> Address {
        let passenger = Address::generate(&self.env);
        token::StellarAssetClient::new(&self.env, &self.token).mint(&passenger, &PREMIUM);
        passenger
    }

    /// Stand-in for airline funding forwarded to the vault.
    fn fund_vault(&self, amount: i128) {
        token::StellarAssetClient::new(&self.env, &self.token).mint(&self.contract_id, &amount);
    }

    fn resolve(&self, flight: &FlightKey, status: StatusCode) {
        self.oracle()
            .set_status(&flight.code, &flight.timestamp, &status);
    }
}

fn setup() -> Setup {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = env
        .register_stellar_asset_contract_v2(token_admin)
        .address();

    let oracle = env.register(MockFlightOracle, ());
    let governance = env.register(MockGovernance, ());

    let contract_id = env.register(InsuranceSettlement, ());
    InsuranceSettlementClient::new(&env, &contract_id).initialize(
        &admin,
        &SettlementConfig {
            asset: token.clone(),
            oracle: oracle.clone(),
            governance: governance.clone(),
            premium_cap: DEFAULT_PREMIUM_CAP,
            payout_bps: DEFAULT_PAYOUT_BPS,
        },
    );

    Setup {
        env,
        contract_id,
        token,
        oracle,
        governance,
    }
}

// ----- Tests -----

#[test]
fn test_initialize_twice_fails() {
    let s = setup();
    let config = s.client().get_config();
    let result = s.client().try_initialize(&Address::generate(&s.env), &config);
    assert_eq!(result, Err(Ok(SettlementError::AlreadyInitialized)));
}

#[test]
fn test_initialize_rejects_zero_payout_rate() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(InsuranceSettlement, ());
    let client = InsuranceSettlementClient::new(&env, &contract_id);

    let result = client.try_initialize(
        &Address::generate(&env),
        &SettlementConfig {
            asset: Address::generate(&env),
            oracle: Address::generate(&env),
            governance: Address::generate(&env),
            premium_cap: DEFAULT_PREMIUM_CAP,
            payout_bps: 0,
        },
    );
    assert_eq!(result, Err(Ok(SettlementError::InvalidConfig)));
}

#[test]
fn test_buy_insurance_moves_premium_to_vault() {
    let s = setup();
    let flight = s.flight("ND1309");
    let passenger = s.passenger();

    let policy = s.client().buy_insurance(&passenger, &flight, &PREMIUM);

    assert_eq!(policy.premium, PREMIUM);
    assert_eq!(policy.credited, 0);
    assert!(!policy.withdrawn);
    assert_eq!(s.token().balance(&passenger), 0);
    assert_eq!(s.token().balance(&s.contract_id), PREMIUM);
    assert_eq!(s.client().flight_policies(&flight, &0, &10), Vec::from_array(&s.env, [passenger.clone()]));
    assert_eq!(s.client().flight_book(&flight).premiums, PREMIUM);
    assert_eq!(s.client().get_policy(&passenger, &flight), Some(policy));
}

#[test]
fn test_premium_above_cap_is_rejected() {
    let s = setup();
    let flight = s.flight("ND1309");
    let passenger = Address::generate(&s.env);
    token::StellarAssetClient::new(&s.env, &s.token).mint(&passenger, &(PREMIUM + 1));

    let result = s.client().try_buy_insurance(&passenger, &flight, &(PREMIUM + 1));
    assert_eq!(result, Err(Ok(SettlementError::ExceedsPremiumCap)));
    assert_eq!(s.token().balance(&passenger), PREMIUM + 1);
}

#[test]
fn test_zero_premium_is_rejected() {
    let s = setup();
    let flight = s.flight("ND1309");
    let result = s
        .client()
        .try_buy_insurance(&Address::generate(&s.env), &flight, &0);
    assert_eq!(result, Err(Ok(SettlementError::InvalidAmount)));
}

#[test]
fn test_unregistered_flight_cannot_be_insured() {
    let s = setup();
    let flight = FlightKey {
        airline: String::from_str(&s.env, "Airline0"),
        code: String::from_str(&s.env, "XX0000"),
        timestamp: DEPARTURE,
    };
    let result = s.client().try_buy_insurance(&s.passenger(), &flight, &PREMIUM);
    assert_eq!(result, Err(Ok(SettlementError::FlightNotRegistered)));
}

#[test]
fn test_second_policy_on_same_flight_is_rejected() {
    let s = setup();
    let flight = s.flight("ND1309");
    let passenger = s.passenger();
    s.client().buy_insurance(&passenger, &flight, &(PREMIUM / 2));

    let result = s
        .client()
        .try_buy_insurance(&passenger, &flight, &(PREMIUM / 2));
    assert_eq!(result, Err(Ok(SettlementError::AlreadyInsured)));
}

#[test]
fn test_cannot_insure_flight_with_known_status() {
    let s = setup();
    let flight = s.flight("ND1309");
    s.resolve(&flight, StatusCode::OnTime);

    let result = s.client().try_buy_insurance(&s.passenger(), &flight, &PREMIUM);
    assert_eq!(result, Err(Ok(SettlementError::StatusAlreadyResolved)));
}

#[test]
fn test_settle_before_resolution_fails() {
    let s = setup();
    let flight = s.flight("ND1309");
    s.client().buy_insurance(&s.passenger(), &flight, &PREMIUM);

    let result = s.client().try_settle(&flight);
    assert_eq!(result, Err(Ok(SettlementError::NotYetResolved)));
    assert_eq!(s.client().settlement_status(&flight), None);
}

#[test]
fn test_late_airline_pays_one_and_a_half_times_premium() {
    let s = setup();
    s.fund_vault(100_000_000);
    let flight = s.flight("ND1309");
    let passenger = s.passenger();
    s.client().buy_insurance(&passenger, &flight, &PREMIUM);

    s.resolve(&flight, StatusCode::LateAirline);
    assert_eq!(s.client().settle(&flight), PAYOUT);
    assert_eq!(s.client().credited_amount(&passenger, &flight), PAYOUT);

    let settlement = s.client().settlement_status(&flight).unwrap();
    assert_eq!(settlement.status, StatusCode::LateAirline);
    assert_eq!(settlement.total_credited, PAYOUT);
    assert_eq!(settlement.policies, 1);

    assert_eq!(s.client().claim(&passenger, &flight), PAYOUT);
    assert_eq!(s.token().balance(&passenger), PAYOUT);
    assert!(s.client().get_policy(&passenger, &flight).unwrap().withdrawn);
}

#[test]
fn test_settlement_credits_every_policy_on_flight() {
    let s = setup();
    s.fund_vault(100_000_000);
    let flight = s.flight("ND1309");
    let first = s.passenger();
    let second = s.passenger();
    s.client().buy_insurance(&first, &flight, &PREMIUM);
    s.client().buy_insurance(&second, &flight, &(PREMIUM / 5));

    s.resolve(&flight, StatusCode::LateAirline);
    let total = s.client().settle(&flight);

    assert_eq!(s.client().credited_amount(&first, &flight), PAYOUT);
    assert_eq!(s.client().credited_amount(&second, &flight), 3_000_000);
    assert_eq!(total, PAYOUT + 3_000_000);
}

#[test]
fn test_settlement_does_not_visit_policies() {
    let s = setup();
    s.env.cost_estimate().budget().reset_unlimited();
    s.fund_vault(1_000_000_000);
    let flight = s.flight("ND1309");

    let passengers: std::vec::Vec<Address> = (0..60)
        .map(|_| {
            let passenger = s.passenger();
            s.client().buy_insurance(&passenger, &flight, &PREMIUM);
            passenger
        })
        .collect();
    assert_eq!(s.client().flight_book(&flight).policies, 60);
    assert_eq!(s.client().flight_book(&flight).exposure, PAYOUT * 60);

    s.resolve(&flight, StatusCode::LateAirline);
    assert_eq!(s.client().settle(&flight), PAYOUT * 60);
    assert_eq!(s.client().settlement_status(&flight).unwrap().policies, 60);

    // credits are written by claims, not by settlement
    let last = &passengers[59];
    assert_eq!(s.client().get_policy(last, &flight).unwrap().credited, 0);
    assert_eq!(s.client().credited_amount(last, &flight), PAYOUT);

    assert_eq!(s.client().claim(last, &flight), PAYOUT);
    assert_eq!(s.client().get_policy(last, &flight).unwrap().credited, PAYOUT);
    assert_eq!(s.client().claim(&passengers[0], &flight), PAYOUT);
    assert_eq!(
        s.client().try_claim(last, &flight),
        Err(Ok(SettlementError::NothingOwed))
    );
}

#[test]
fn test_flight_policies_are_paged() {
    let s = setup();
    s.env.cost_estimate().budget().reset_unlimited();
    let flight = s.flight("ND1309");
    let passengers: std::vec::Vec<Address> = (0..60)
        .map(|_| {
            let passenger = s.passenger();
            s.client().buy_insurance(&passenger, &flight, &(PREMIUM / 10));
            passenger
        })
        .collect();

    let first = s.client().flight_policies(&flight, &0, &100);
    assert_eq!(first.len(), MAX_POLICY_PAGE);
    assert_eq!(first.get(0).unwrap(), passengers[0]);

    let rest = s.client().flight_policies(&flight, &MAX_POLICY_PAGE, &100);
    assert_eq!(rest.len(), 10);
    assert_eq!(rest.get(9).unwrap(), passengers[59]);

    assert!(s.client().flight_policies(&flight, &60, &10).is_empty());
}

#[test]
fn test_other_statuses_credit_nothing() {
    let statuses = [
        StatusCode::Unknown,
        StatusCode::OnTime,
        StatusCode::LateWeather,
        StatusCode::LateTechnical,
        StatusCode::LateOther,
    ];
    for status in statuses {
        let s = setup();
        let flight = s.flight("ND1309");
        let passenger = s.passenger();
        s.client().buy_insurance(&passenger, &flight, &PREMIUM);

        s.resolve(&flight, status);
        assert_eq!(s.client().settle(&flight), 0);
        assert_eq!(s.client().credited_amount(&passenger, &flight), 0);

        let result = s.client().try_claim(&passenger, &flight);
        assert_eq!(result, Err(Ok(SettlementError::NothingOwed)));
    }
}

#[test]
fn test_repeated_settle_does_not_credit_twice() {
    let s = setup();
    let flight = s.flight("ND1309");
    let passenger = s.passenger();
    s.client().buy_insurance(&passenger, &flight, &PREMIUM);
    s.resolve(&flight, StatusCode::LateAirline);

    assert_eq!(s.client().settle(&flight), PAYOUT);
    assert_eq!(s.client().settle(&flight), 0);
    assert_eq!(s.client().credited_amount(&passenger, &flight), PAYOUT);
    assert_eq!(
        s.client().settlement_status(&flight).unwrap().total_credited,
        PAYOUT
    );
}

#[test]
fn test_double_claim_fails() {
    let s = setup();
    s.fund_vault(100_000_000);
    let flight = s.flight("ND1309");
    let passenger = s.passenger();
    s.client().buy_insurance(&passenger, &flight, &PREMIUM);
    s.resolve(&flight, StatusCode::LateAirline);
    s.client().settle(&flight);

    s.client().claim(&passenger, &flight);
    let result = s.client().try_claim(&passenger, &flight);
    assert_eq!(result, Err(Ok(SettlementError::NothingOwed)));
    assert_eq!(s.token().balance(&passenger), PAYOUT);
}

#[test]
fn test_claim_without_policy_fails() {
    let s = setup();
    let flight = s.flight("ND1309");
    let result = s.client().try_claim(&Address::generate(&s.env), &flight);
    assert_eq!(result, Err(Ok(SettlementError::NothingOwed)));
}

#[test]
fn test_claim_fails_when_vault_cannot_cover_payout() {
    let s = setup();
    let flight = s.flight("ND1309");
    let passenger = s.passenger();
    s.client().buy_insurance(&passenger, &flight, &PREMIUM);
    s.resolve(&flight, StatusCode::LateAirline);
    s.client().settle(&flight);

    // vault holds only the premium
    let result = s.client().try_claim(&passenger, &flight);
    assert_eq!(result, Err(Ok(SettlementError::InsufficientLiquidity)));
    assert!(!s.client().get_policy(&passenger, &flight).unwrap().withdrawn);

    s.fund_vault(PAYOUT);
    assert_eq!(s.client().claim(&passenger, &flight), PAYOUT);
}

#[test]
fn test_buy_after_settlement_is_rejected() {
    let s = setup();
    let flight = s.flight("ND1309");
    s.client().buy_insurance(&s.passenger(), &flight, &PREMIUM);
    s.resolve(&flight, StatusCode::LateAirline);
    s.client().settle(&flight);

    let result = s.client().try_buy_insurance(&s.passenger(), &flight, &PREMIUM);
    assert_eq!(result, Err(Ok(SettlementError::StatusAlreadyResolved)));
}

#[test]
fn test_paused_system_rejects_settlement_operations() {
    let s = setup();
    let flight = s.flight("ND1309");
    let passenger = s.passenger();
    s.client().buy_insurance(&passenger, &flight, &(PREMIUM / 2));
    s.resolve(&flight, StatusCode::LateAirline);

    s.governance().set_operational(&false);

    assert_eq!(
        s.client().try_buy_insurance(&s.passenger(), &flight, &PREMIUM),
        Err(Ok(SettlementError::SystemNotOperational))
    );
    assert_eq!(
        s.client().try_settle(&flight),
        Err(Ok(SettlementError::SystemNotOperational))
    );
    assert_eq!(
        s.client().try_claim(&passenger, &flight),
        Err(Ok(SettlementError::SystemNotOperational))
    );

    s.governance().set_operational(&true);
    assert_eq!(s.client().settle(&flight), 7_500_000);
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #5)")]
fn test_premium_above_cap_panics_through_client() {
    let s = setup();
    let flight = s.flight("ND1309");
    s.client()
        .buy_insurance(&Address::generate(&s.env), &flight, &(PREMIUM + 1));
}
