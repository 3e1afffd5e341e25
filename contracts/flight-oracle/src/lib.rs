//! Flight Status Oracle Contract for FlightSurety
//!
//! Oracles register for a fee and receive three shard indices. A status
//! request for a (flight, timestamp) key is bound to one derived index; only
//! oracles covering that index may answer, and the request resolves once
//! `quorum` of them report the same status code.

#![no_std]

use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token, Address, Env, Map, String, Symbol, Vec,
};

pub mod coverage;
mod error;
pub mod index;
pub mod quorum;
mod types;

pub use error::OracleError;
pub use types::*;

use quorum::Submission;

/// Event symbols
const INITIALIZED: Symbol = symbol_short!("init");
const ORACLE_REGISTERED: Symbol = symbol_short!("or_reg");
const ORACLE_REQUEST: Symbol = symbol_short!("or_req");
const ORACLE_RESPONSE: Symbol = symbol_short!("or_resp");
const STATUS_RESOLVED: Symbol = symbol_short!("status");
const FEES_WITHDRAWN: Symbol = symbol_short!("fee_wdr");

#[contract]
pub struct FlightOracle;

#[contractimpl]
impl FlightOracle {
    /// Initialize the oracle network.
    ///
    /// # Arguments
    /// * `admin` - Address allowed to sweep collected registration fees
    /// * `config` - Fee, shard range and quorum for this deployment
    ///
    /// # Events
    /// Emits `init`
    pub fn initialize(env: Env, admin: Address, config: OracleConfig) -> Result<(), OracleError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(OracleError::AlreadyInitialized);
        }

        if config.registration_fee < 0
            || config.index_range < INDEXES_PER_ORACLE
            || config.index_range > MAX_INDEX_RANGE
            || config.quorum == 0
        {
            return Err(OracleError::InvalidConfig);
        }

        // One counter per shard index
        let mut coverage: Vec<u32> = Vec::new(&env);
        for _ in 0..config.index_range {
            coverage.push_back(0);
        }

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::OracleCount, &0u32);
        env.storage().instance().set(&DataKey::Coverage, &coverage);

        env.events().publish((INITIALIZED,), (admin,));

        Ok(())
    }

    /// Register the calling oracle and assign its shard indices.
    ///
    /// # Arguments
    /// * `oracle` - Oracle address (must authorize)
    /// * `payment` - Amount the oracle offers; must cover the registration fee
    ///
    /// # Returns
    /// The three indices assigned to the oracle
    ///
    /// # Events
    /// Emits `or_reg`
    pub fn register_oracle(env: Env, oracle: Address, payment: i128) -> Result<Vec<u32>, OracleError> {
        oracle.require_auth();
        let config = Self::config(&env)?;

        // Check if oracle is already registered
        let key = DataKey::Oracle(oracle.clone());
        if env.storage().persistent().has(&key) {
            return Err(OracleError::AlreadyRegistered);
        }

        if payment < config.registration_fee {
            return Err(OracleError::InsufficientFee);
        }

        // Collect the fee, never more
        if config.registration_fee > 0 {
            let token_client = token::Client::new(&env, &config.fee_token);
            token_client.transfer(
                &oracle,
                &env.current_contract_address(),
                &config.registration_fee,
            );
        }

        let indexes = index::assign_indexes(&env, config.index_range);

        let record = Oracle {
            address: oracle.clone(),
            indexes: indexes.clone(),
            registered_at: env.ledger().timestamp(),
        };
        env.storage().persistent().set(&key, &record);

        // Update coverage table
        let mut coverage = Self::coverage_table(&env);
        for i in indexes.iter() {
            let current = coverage.get(i).unwrap_or(0);
            coverage.set(i, current + 1);
        }
        env.storage().instance().set(&DataKey::Coverage, &coverage);

        let count = Self::oracle_count(env.clone()) + 1;
        env.storage().instance().set(&DataKey::OracleCount, &count);

        log!(&env, "oracle registered", oracle, indexes);
        env.events()
            .publish((ORACLE_REGISTERED,), (oracle, indexes.clone()));

        Ok(indexes)
    }

    /// Issue (or reissue) a status request for a flight.
    ///
    /// Opens a response round on a freshly derived shard index. Reissuing a
    /// request whose index is covered by fewer than `quorum` oracles starts a
    /// new round on a new index and discards the old reports. A covered round
    /// is left untouched and its notification is returned again.
    ///
    /// # Returns
    /// The request notification, including how many registered oracles cover
    /// the derived index. Callers reissue while coverage is below the quorum.
    ///
    /// # Events
    /// Emits `or_req` with (index, flight, timestamp)
    pub fn fetch_status(
        env: Env,
        requester: Address,
        flight: String,
        timestamp: u64,
    ) -> Result<OracleRequest, OracleError> {
        requester.require_auth();
        let config = Self::config(&env)?;

        let key = DataKey::Request(flight.clone(), timestamp);
        let existing: Option<StatusRequest> = env.storage().persistent().get(&key);

        // A round whose index can reach quorum keeps running; reissuing only
        // replaces rounds that could never resolve
        if let Some(request) = &existing {
            if request.resolved.is_some() {
                return Err(OracleError::AlreadyResolved);
            }
            let coverage = Self::coverage(env.clone(), request.index);
            if coverage >= config.quorum {
                env.events()
                    .publish((ORACLE_REQUEST,), (request.index, flight.clone(), timestamp));
                return Ok(OracleRequest {
                    index: request.index,
                    flight,
                    timestamp,
                    round: request.round,
                    coverage,
                });
            }
        }

        let index = index::derive_request_index(&env, &flight, timestamp, config.index_range);

        let request = match existing {
            Some(mut request) => {
                quorum::reopen(&env, &mut request, index);
                request.requester = requester;
                request.opened_at = env.ledger().timestamp();
                request
            }
            None => StatusRequest {
                flight: flight.clone(),
                timestamp,
                requester,
                index,
                round: 1,
                responses: Map::new(&env),
                tally: Map::new(&env),
                resolved: None,
                opened_at: env.ledger().timestamp(),
            },
        };

        env.storage().persistent().set(&key, &request);

        let coverage = Self::coverage(env.clone(), index);

        env.events()
            .publish((ORACLE_REQUEST,), (index, flight.clone(), timestamp));

        Ok(OracleRequest {
            index,
            flight,
            timestamp,
            round: request.round,
            coverage,
        })
    }

    /// Submit an oracle's observed status for an open request.
    ///
    /// # Arguments
    /// * `oracle` - Reporting oracle (must authorize)
    /// * `flight` / `timestamp` - Request key
    /// * `status_code` - One of the standard `StatusCode` values
    ///
    /// A repeated report from the same oracle in the same round is accepted
    /// and ignored.
    ///
    /// # Events
    /// Emits `or_resp` for every recorded report and `status` when the request
    /// reaches quorum
    pub fn submit_response(
        env: Env,
        oracle: Address,
        flight: String,
        timestamp: u64,
        status_code: u32,
    ) -> Result<(), OracleError> {
        oracle.require_auth();
        let config = Self::config(&env)?;

        // Verify oracle is registered
        let registered: Oracle = env
            .storage()
            .persistent()
            .get(&DataKey::Oracle(oracle.clone()))
            .ok_or(OracleError::UnknownOracle)?;

        let key = DataKey::Request(flight.clone(), timestamp);
        let mut request: StatusRequest = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(OracleError::RequestNotOpen)?;

        if request.resolved.is_some() {
            return Err(OracleError::AlreadyResolved);
        }

        let status = StatusCode::from_code(status_code).ok_or(OracleError::InvalidStatusCode)?;

        // Only oracles holding the request's index may answer
        if !index::covers(&registered.indexes, request.index) {
            return Err(OracleError::IndexMismatch);
        }

        match quorum::record_response(&mut request, &oracle, status, config.quorum) {
            Submission::Duplicate => return Ok(()),
            Submission::Recorded { matching } => {
                log!(&env, "response recorded", flight, status_code, matching);
                env.storage().persistent().set(&key, &request);
                env.events().publish(
                    (ORACLE_RESPONSE,),
                    (flight, timestamp, oracle, status_code),
                );
            }
            Submission::Resolved(status) => {
                env.storage().persistent().set(&key, &request);
                env.events().publish(
                    (ORACLE_RESPONSE,),
                    (flight.clone(), timestamp, oracle, status_code),
                );
                env.events()
                    .publish((STATUS_RESOLVED,), (flight, timestamp, status.code()));
            }
        }

        Ok(())
    }

    /// Get the confirmed status of a flight.
    pub fn view_status(env: Env, flight: String, timestamp: u64) -> Result<StatusCode, OracleError> {
        Self::resolved_status(env, flight, timestamp).ok_or(OracleError::NotYetResolved)
    }

    /// Confirmed status of a flight, if any. Never fails, for cross-contract reads.
    pub fn resolved_status(env: Env, flight: String, timestamp: u64) -> Option<StatusCode> {
        let request: Option<StatusRequest> = env
            .storage()
            .persistent()
            .get(&DataKey::Request(flight, timestamp));
        request.and_then(|request| request.resolved)
    }

    /// Get the full request aggregate for a flight.
    pub fn get_request(env: Env, flight: String, timestamp: u64) -> Option<StatusRequest> {
        env.storage()
            .persistent()
            .get(&DataKey::Request(flight, timestamp))
    }

    /// Get the shard indices assigned to an oracle.
    pub fn get_oracle_indexes(env: Env, oracle: Address) -> Result<Vec<u32>, OracleError> {
        let record: Oracle = env
            .storage()
            .persistent()
            .get(&DataKey::Oracle(oracle))
            .ok_or(OracleError::UnknownOracle)?;
        Ok(record.indexes)
    }

    pub fn is_oracle_registered(env: Env, oracle: Address) -> bool {
        env.storage().persistent().has(&DataKey::Oracle(oracle))
    }

    /// Get the total number of registered oracles
    pub fn oracle_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::OracleCount)
            .unwrap_or(0)
    }

    /// Number of registered oracles holding `index`.
    pub fn coverage(env: Env, index: u32) -> u32 {
        Self::coverage_table(&env).get(index).unwrap_or(0)
    }

    pub fn get_config(env: Env) -> Result<OracleConfig, OracleError> {
        Self::config(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, OracleError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(OracleError::NotInitialized)
    }

    /// Sweep collected registration fees (admin only).
    pub fn withdraw_fees(env: Env, to: Address, amount: i128) -> Result<(), OracleError> {
        let admin = Self::get_admin(env.clone())?;
        admin.require_auth();

        if amount <= 0 {
            return Err(OracleError::InvalidAmount);
        }

        let config = Self::config(&env)?;
        let token_client = token::Client::new(&env, &config.fee_token);
        token_client.transfer(&env.current_contract_address(), &to, &amount);

        env.events().publish((FEES_WITHDRAWN,), (to, amount));

        Ok(())
    }

    // Helper functions

    fn config(env: &Env) -> Result<OracleConfig, OracleError> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(OracleError::NotInitialized)
    }

    fn coverage_table(env: &Env) -> Vec<u32> {
        env.storage()
            .instance()
            .get(&DataKey::Coverage)
            .unwrap_or(Vec::new(env))
    }
}
