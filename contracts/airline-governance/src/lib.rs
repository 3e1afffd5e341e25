//! Airline Governance Contract for FlightSurety
//!
//! Holds the airline, admin and flight registries and the operational-mode
//! circuit breaker. Airline admission and mode changes are multi-party
//! decisions made through threshold voting; airlines only participate (vote,
//! sponsor, register flights) once they have funded the insurance vault.

#![no_std]

use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token, Address, Env, String, Symbol, Vec,
};

mod error;
mod types;
pub mod voting;

pub use error::GovernanceError;
pub use types::*;

use voting::VoteOutcome;

/// Event symbols
const INITIALIZED: Symbol = symbol_short!("init");
const ADMIN_ADDED: Symbol = symbol_short!("adm_add");
const MODE_VOTE: Symbol = symbol_short!("mode_vote");
const MODE_CHANGED: Symbol = symbol_short!("mode_set");
const AIRLINE_VOTE: Symbol = symbol_short!("al_vote");
const AIRLINE_REGISTERED: Symbol = symbol_short!("al_reg");
const AIRLINE_FUNDED: Symbol = symbol_short!("al_fund");
const AIRLINE_ACTIVE: Symbol = symbol_short!("al_act");
const FLIGHT_REGISTERED: Symbol = symbol_short!("fl_reg");

#[contract]
pub struct AirlineGovernance;

#[contractimpl]
impl AirlineGovernance {
    /// Initialize governance with its owner and the first airline.
    ///
    /// The owner becomes the first admin. The first airline is registered
    /// directly but stays inactive until it funds.
    ///
    /// # Events
    /// Emits `init` and `al_reg`
    pub fn initialize(
        env: Env,
        owner: Address,
        first_airline_name: String,
        first_airline: Address,
        config: GovernanceConfig,
    ) -> Result<(), GovernanceError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(GovernanceError::AlreadyInitialized);
        }

        if config.funding_threshold <= 0 || config.consensus_floor == 0 {
            return Err(GovernanceError::InvalidConfig);
        }

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Operational, &true);
        env.storage().instance().set(&DataKey::AdminCount, &1u32);
        env.storage()
            .instance()
            .set(&DataKey::ActiveAirlineCount, &0u32);
        env.storage().persistent().set(&DataKey::Admin(owner.clone()), &true);

        Self::admit_airline(&env, first_airline_name, first_airline);

        env.events().publish((INITIALIZED,), (owner,));

        Ok(())
    }

    /// Add an admin to the operational-mode voter set (owner only).
    pub fn register_admin(env: Env, admin: Address) -> Result<(), GovernanceError> {
        let owner = Self::get_owner(env.clone())?;
        owner.require_auth();

        let key = DataKey::Admin(admin.clone());
        if env.storage().persistent().has(&key) {
            return Err(GovernanceError::AlreadyRegistered);
        }
        env.storage().persistent().set(&key, &true);

        let count = Self::admin_count(env.clone()) + 1;
        env.storage().instance().set(&DataKey::AdminCount, &count);

        env.events().publish((ADMIN_ADDED,), (admin, count));

        Ok(())
    }

    /// Vote to switch the operational mode.
    ///
    /// # Arguments
    /// * `admin` - Voting admin (must authorize)
    /// * `mode` - Requested mode; must differ from the current one
    ///
    /// # Returns
    /// `true` if this vote crossed the threshold and the mode was switched
    ///
    /// # Events
    /// Emits `mode_vote` while pending, `mode_set` on switch
    pub fn set_operating_status(env: Env, admin: Address, mode: bool) -> Result<bool, GovernanceError> {
        admin.require_auth();
        Self::config(&env)?;

        // Check voter is an admin
        if !Self::is_admin(env.clone(), admin.clone()) {
            return Err(GovernanceError::NotEligibleVoter);
        }
        if Self::is_operational(env.clone()) == mode {
            return Err(GovernanceError::ModeUnchanged);
        }

        let proposal = ProposalKey::OperationalMode(mode);
        let eligible = Self::admin_count(env.clone());

        match voting::cast_vote(&env, &proposal, &admin, eligible, voting::majority)? {
            VoteOutcome::Pending { votes, required } => {
                env.events()
                    .publish((MODE_VOTE,), (admin, mode, votes, required));
                Ok(false)
            }
            VoteOutcome::Passed { votes } => {
                env.storage().instance().set(&DataKey::Operational, &mode);
                voting::clear(&env, &ProposalKey::OperationalMode(!mode));

                log!(&env, "operational mode switched", mode, votes);
                env.events().publish((MODE_CHANGED,), (mode, votes));
                Ok(true)
            }
        }
    }

    /// Register, or vote to register, a new airline.
    ///
    /// While fewer than `consensus_floor` airlines are active, any active
    /// airline registers a new one on its own. From then on each call is one
    /// approval, and the airline is registered once half of the active
    /// airlines (rounded up) approved it.
    ///
    /// # Arguments
    /// * `sponsor` - Active airline address (must authorize)
    /// * `name` - Unique airline name
    /// * `airline` - Address the new airline will act from
    ///
    /// # Returns
    /// The airline's registration status after this call
    ///
    /// # Events
    /// Emits `al_vote` while pending, `al_reg` on registration
    pub fn register_airline(
        env: Env,
        sponsor: Address,
        name: String,
        airline: Address,
    ) -> Result<RegistrationStatus, GovernanceError> {
        sponsor.require_auth();
        let config = Self::config(&env)?;
        Self::require_operational(&env)?;

        // Only funded airlines sponsor or vote
        match Self::airline_by_address(&env, &sponsor) {
            Some(record) if record.active => {}
            _ => return Err(GovernanceError::NotEligibleVoter),
        }

        // Check name and address are free
        let existing = Self::get_airline(env.clone(), name.clone());
        if let Some(record) = &existing {
            if record.status == RegistrationStatus::Registered || record.address != airline {
                return Err(GovernanceError::AlreadyRegistered);
            }
        }
        let bound_name: Option<String> = env
            .storage()
            .persistent()
            .get(&DataKey::AirlineByAddress(airline.clone()));
        if let Some(bound_name) = bound_name {
            if bound_name != name {
                return Err(GovernanceError::AlreadyRegistered);
            }
        }

        // Below the floor a single sponsor is enough
        let active = Self::active_airline_count(env.clone());
        if active < config.consensus_floor {
            Self::admit_airline(&env, name, airline);
            return Ok(RegistrationStatus::Registered);
        }

        let proposal = ProposalKey::AirlineAdmission(name.clone());
        match voting::cast_vote(&env, &proposal, &sponsor, active, voting::majority)? {
            VoteOutcome::Pending { votes, required } => {
                if existing.is_none() {
                    let record = Airline {
                        name: name.clone(),
                        address: airline.clone(),
                        funding: 0,
                        status: RegistrationStatus::Proposed,
                        active: false,
                        registered_at: 0,
                    };
                    env.storage()
                        .persistent()
                        .set(&DataKey::Airline(name.clone()), &record);
                    env.storage()
                        .persistent()
                        .set(&DataKey::AirlineByAddress(airline), &name);
                }

                env.events()
                    .publish((AIRLINE_VOTE,), (name, sponsor, votes, required));
                Ok(RegistrationStatus::Proposed)
            }
            VoteOutcome::Passed { votes } => {
                log!(&env, "airline admitted by vote", name, votes);
                Self::admit_airline(&env, name, airline);
                Ok(RegistrationStatus::Registered)
            }
        }
    }

    /// Fund a registered airline; forwards the funds to the vault.
    ///
    /// # Returns
    /// The airline's total funding after this payment
    ///
    /// # Events
    /// Emits `al_fund`, and `al_act` when the airline becomes active
    pub fn fund_airline(env: Env, airline: Address, amount: i128) -> Result<i128, GovernanceError> {
        airline.require_auth();
        let config = Self::config(&env)?;

        if amount <= 0 {
            return Err(GovernanceError::InvalidAmount);
        }

        let mut record = match Self::airline_by_address(&env, &airline) {
            Some(record) if record.status == RegistrationStatus::Registered => record,
            _ => return Err(GovernanceError::AirlineNotRegistered),
        };

        // Forward funds to the vault
        let token_client = token::Client::new(&env, &config.asset);
        token_client.transfer(&airline, &config.vault, &amount);

        record.funding = record
            .funding
            .checked_add(amount)
            .ok_or(GovernanceError::InvalidAmount)?;

        env.events()
            .publish((AIRLINE_FUNDED,), (record.name.clone(), amount, record.funding));

        if !record.active && record.funding >= config.funding_threshold {
            record.active = true;
            let active = Self::active_airline_count(env.clone()) + 1;
            env.storage()
                .instance()
                .set(&DataKey::ActiveAirlineCount, &active);
            env.events()
                .publish((AIRLINE_ACTIVE,), (record.name.clone(), active));
        }

        // Save updated record
        env.storage()
            .persistent()
            .set(&DataKey::Airline(record.name.clone()), &record);

        Ok(record.funding)
    }

    /// Register a flight for an active airline.
    ///
    /// # Arguments
    /// * `airline` - The airline's own address (must authorize)
    /// * `airline_name` - Name the airline is registered under
    /// * `code` - Flight code
    /// * `timestamp` - Scheduled departure
    ///
    /// # Events
    /// Emits `fl_reg`
    pub fn register_flight(
        env: Env,
        airline: Address,
        airline_name: String,
        code: String,
        timestamp: u64,
    ) -> Result<FlightKey, GovernanceError> {
        airline.require_auth();
        Self::config(&env)?;
        Self::require_operational(&env)?;

        // Verify caller owns an active airline
        let record = Self::get_airline(env.clone(), airline_name.clone())
            .ok_or(GovernanceError::AirlineNotRegistered)?;
        if record.address != airline {
            return Err(GovernanceError::Unauthorized);
        }
        if !record.active {
            return Err(GovernanceError::NotActiveAirline);
        }

        // Oracle statuses are keyed by (code, timestamp): one airline per slot
        let slot = DataKey::FlightSlot(code.clone(), timestamp);
        if env.storage().persistent().has(&slot) {
            return Err(GovernanceError::FlightAlreadyRegistered);
        }

        let key = FlightKey {
            airline: airline_name,
            code,
            timestamp,
        };

        // Save the flight and claim its slot
        let flight = Flight {
            key: key.clone(),
            registered_by: airline,
            registered_at: env.ledger().timestamp(),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Flight(key.clone()), &flight);
        env.storage().persistent().set(&slot, &key.airline);

        env.events().publish(
            (FLIGHT_REGISTERED,),
            (key.airline.clone(), key.code.clone(), key.timestamp),
        );

        Ok(key)
    }

    pub fn is_operational(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Operational)
            .unwrap_or(false)
    }

    pub fn is_admin(env: Env, admin: Address) -> bool {
        env.storage().persistent().has(&DataKey::Admin(admin))
    }

    pub fn admin_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::AdminCount)
            .unwrap_or(0)
    }

    pub fn get_airline(env: Env, name: String) -> Option<Airline> {
        env.storage().persistent().get(&DataKey::Airline(name))
    }

    pub fn is_airline_registered(env: Env, name: String) -> bool {
        matches!(
            Self::get_airline(env, name),
            Some(Airline { status: RegistrationStatus::Registered, .. })
        )
    }

    pub fn is_airline_address_registered(env: Env, airline: Address) -> bool {
        matches!(
            Self::airline_by_address(&env, &airline),
            Some(Airline { status: RegistrationStatus::Registered, .. })
        )
    }

    pub fn is_airline_active(env: Env, name: String) -> bool {
        Self::get_airline(env, name).map_or(false, |record| record.active)
    }

    pub fn airline_funding(env: Env, name: String) -> Result<i128, GovernanceError> {
        Self::get_airline(env, name)
            .map(|record| record.funding)
            .ok_or(GovernanceError::AirlineNotRegistered)
    }

    pub fn registered_airline_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::RegisteredAirlineCount)
            .unwrap_or(0)
    }

    pub fn active_airline_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::ActiveAirlineCount)
            .unwrap_or(0)
    }

    /// Principals that approved a pending proposal.
    pub fn get_ballot(env: Env, proposal: ProposalKey) -> Vec<Address> {
        voting::ballot(&env, &proposal)
    }

    pub fn is_flight_registered(env: Env, flight: FlightKey) -> bool {
        env.storage().persistent().has(&DataKey::Flight(flight))
    }

    pub fn get_flight(env: Env, flight: FlightKey) -> Option<Flight> {
        env.storage().persistent().get(&DataKey::Flight(flight))
    }

    pub fn get_config(env: Env) -> Result<GovernanceConfig, GovernanceError> {
        Self::config(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, GovernanceError> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(GovernanceError::NotInitialized)
    }

    // Helper functions

    fn config(env: &Env) -> Result<GovernanceConfig, GovernanceError> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(GovernanceError::NotInitialized)
    }

    fn require_operational(env: &Env) -> Result<(), GovernanceError> {
        if Self::is_operational(env.clone()) {
            Ok(())
        } else {
            Err(GovernanceError::SystemNotOperational)
        }
    }

    fn airline_by_address(env: &Env, airline: &Address) -> Option<Airline> {
        let name: String = env
            .storage()
            .persistent()
            .get(&DataKey::AirlineByAddress(airline.clone()))?;
        Self::get_airline(env.clone(), name)
    }

    /// Write `name` as a registered, unfunded airline.
    fn admit_airline(env: &Env, name: String, airline: Address) {
        let record = Airline {
            name: name.clone(),
            address: airline.clone(),
            funding: 0,
            status: RegistrationStatus::Registered,
            active: false,
            registered_at: env.ledger().timestamp(),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Airline(name.clone()), &record);
        env.storage()
            .persistent()
            .set(&DataKey::AirlineByAddress(airline.clone()), &name);

        let count = Self::registered_airline_count(env.clone()) + 1;
        env.storage()
            .instance()
            .set(&DataKey::RegisteredAirlineCount, &count);

        env.events()
            .publish((AIRLINE_REGISTERED,), (name, airline, count));
    }
}
