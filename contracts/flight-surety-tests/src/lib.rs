//! Deploys the oracle, governance and settlement contracts into one test
//! environment, wired the way a live network is: governance forwards airline
//! funding to the settlement vault, and settlement reads flight registration
//! from governance and confirmed statuses from the oracle.

use airline_governance::{AirlineGovernance, AirlineGovernanceClient, GovernanceConfig};
use flight_oracle::{FlightOracle, FlightOracleClient, OracleConfig};
use insurance_settlement::{InsuranceSettlement, InsuranceSettlementClient, SettlementConfig};
use soroban_sdk::{testutils::Address as _, token, Address, Env, String};

pub const FIRST_AIRLINE: &str = "Airline0";

pub struct Deployment {
    pub env: Env,
    pub token: Address,
    pub owner: Address,
    pub first_airline: Address,
    pub oracle_id: Address,
    pub governance_id: Address,
    pub settlement_id: Address,
}

impl Deployment {
    /// Deploy all three contracts with default parameters.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.cost_estimate().budget().reset_unlimited();

        let owner = Address::generate(&env);
        let first_airline = Address::generate(&env);
        let token = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();

        let oracle_id = env.register(FlightOracle, ());
        let governance_id = env.register(AirlineGovernance, ());
        let settlement_id = env.register(InsuranceSettlement, ());

        FlightOracleClient::new(&env, &oracle_id).initialize(
            &owner,
            &OracleConfig {
                fee_token: token.clone(),
                registration_fee: flight_oracle::DEFAULT_REGISTRATION_FEE,
                index_range: flight_oracle::DEFAULT_INDEX_RANGE,
                quorum: flight_oracle::DEFAULT_QUORUM,
            },
        );

        AirlineGovernanceClient::new(&env, &governance_id).initialize(
            &owner,
            &String::from_str(&env, FIRST_AIRLINE),
            &first_airline,
            &GovernanceConfig {
                asset: token.clone(),
                vault: settlement_id.clone(),
                funding_threshold: airline_governance::DEFAULT_FUNDING_THRESHOLD,
                consensus_floor: airline_governance::DEFAULT_CONSENSUS_FLOOR,
            },
        );

        InsuranceSettlementClient::new(&env, &settlement_id).initialize(
            &owner,
            &SettlementConfig {
                asset: token.clone(),
                oracle: oracle_id.clone(),
                governance: governance_id.clone(),
                premium_cap: insurance_settlement::DEFAULT_PREMIUM_CAP,
                payout_bps: insurance_settlement::DEFAULT_PAYOUT_BPS,
            },
        );

        Deployment {
            env,
            token,
            owner,
            first_airline,
            oracle_id,
            governance_id,
            settlement_id,
        }
    }

    pub fn oracle(&self) -> FlightOracleClient<'_> {
        FlightOracleClient::new(&self.env, &self.oracle_id)
    }

    pub fn governance(&self) -> AirlineGovernanceClient<'_> {
        AirlineGovernanceClient::new(&self.env, &self.governance_id)
    }

    pub fn settlement(&self) -> InsuranceSettlementClient<'_> {
        InsuranceSettlementClient::new(&self.env, &self.settlement_id)
    }

    pub fn token(&self) -> token::Client<'_> {
        token::Client::new(&self.env, &self.token)
    }

    pub fn mint(&self, to: &Address, amount: i128) {
        token::StellarAssetClient::new(&self.env, &self.token).mint(to, &amount);
    }

    pub fn name(&self, name: &str) -> String {
        String::from_str(&self.env, name)
    }

    /// Pay the full funding threshold for an admitted airline.
    pub fn fund_airline(&self, airline: &Address) {
        let threshold = airline_governance::DEFAULT_FUNDING_THRESHOLD;
        self.mint(airline, threshold);
        self.governance().fund_airline(airline, &threshold);
    }

    /// Register and fund `count` oracles, returning their addresses.
    pub fn register_oracles(&self, count: u32) -> std::vec::Vec<Address> {
        let fee = flight_oracle::DEFAULT_REGISTRATION_FEE;
        (0..count)
            .map(|_| {
                let oracle = Address::generate(&self.env);
                self.mint(&oracle, fee);
                self.oracle().register_oracle(&oracle, &fee);
                oracle
            })
            .collect()
    }

    /// Have every oracle covering the open request report `status_code`
    /// until the request resolves. Returns the number of reports sent.
    pub fn report_status(
        &self,
        oracles: &[Address],
        flight: &String,
        timestamp: u64,
        status_code: u32,
    ) -> u32 {
        let oracle = self.oracle();
        let mut sent = 0;
        for address in oracles {
            if oracle.resolved_status(flight, &timestamp).is_some() {
                break;
            }
            let request = match oracle.get_request(flight, &timestamp) {
                Some(request) => request,
                None => break,
            };
            if !oracle.get_oracle_indexes(address).contains(request.index) {
                continue;
            }
            oracle.submit_response(address, flight, &timestamp, &status_code);
            sent += 1;
        }
        sent
    }
}

impl Default for Deployment {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a governance flight key into the settlement contract's mirror.
pub fn settlement_key(flight: &airline_governance::FlightKey) -> insurance_settlement::FlightKey {
    insurance_settlement::FlightKey {
        airline: flight.airline.clone(),
        code: flight.code.clone(),
        timestamp: flight.timestamp,
    }
}
