//! Insurance Settlement Contract for FlightSurety
//!
//! Passengers buy cover on registered flights. Once the oracle network has
//! confirmed a flight's status, settlement records the outcome; on a
//! late-airline flight each policy is then owed 1.5x its premium, credited
//! and paid out when its passenger claims.
//!
//! This contract is also the vault: premiums and airline funding are held
//! here and back all payouts.

#![no_std]

use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token, Address, Env, Symbol, Vec,
};

mod error;
mod external;
pub mod payout;
mod types;

pub use error::SettlementError;
pub use types::*;

const INITIALIZED: Symbol = symbol_short!("init");
const INSURANCE_BOUGHT: Symbol = symbol_short!("ins_buy");
const FLIGHT_SETTLED: Symbol = symbol_short!("settled");
const INSURANCE_CLAIMED: Symbol = symbol_short!("ins_claim");

#[contract]
pub struct InsuranceSettlement;

#[contractimpl]
impl InsuranceSettlement {
    /// Initialize the contract with the oracle and governance contracts it
    /// settles against.
    pub fn initialize(env: Env, admin: Address, config: SettlementConfig) -> Result<(), SettlementError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(SettlementError::AlreadyInitialized);
        }

        if config.premium_cap <= 0 || config.payout_bps == 0 {
            return Err(SettlementError::InvalidConfig);
        }

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Config, &config);

        env.events().publish(
            (INITIALIZED,),
            (admin, config.oracle, config.governance),
        );

        Ok(())
    }

    /// Buy insurance for a registered flight.
    ///
    /// # Arguments
    /// * `passenger` - Insured passenger (must authorize)
    /// * `flight` - Flight key as registered with governance
    /// * `amount` - Premium, at most the configured cap
    ///
    /// # Events
    /// Emits `ins_buy`
    pub fn buy_insurance(
        env: Env,
        passenger: Address,
        flight: FlightKey,
        amount: i128,
    ) -> Result<Policy, SettlementError> {
        passenger.require_auth();
        let config = Self::config(&env)?;
        Self::require_operational(&env, &config)?;

        if amount <= 0 {
            return Err(SettlementError::InvalidAmount);
        }
        if amount > config.premium_cap {
            return Err(SettlementError::ExceedsPremiumCap);
        }

        if !external::is_flight_registered(&env, &config.governance, &flight) {
            return Err(SettlementError::FlightNotRegistered);
        }

        // no cover once the outcome is known
        if env
            .storage()
            .persistent()
            .has(&DataKey::Settlement(flight.clone()))
            || external::resolved_status(&env, &config.oracle, &flight).is_some()
        {
            return Err(SettlementError::StatusAlreadyResolved);
        }

        let key = DataKey::Policy(passenger.clone(), flight.clone());
        if env.storage().persistent().has(&key) {
            return Err(SettlementError::AlreadyInsured);
        }

        // Exposure is summed per policy so settlement never has to visit them
        let credit = payout::payout(amount, config.payout_bps).ok_or(SettlementError::InvalidAmount)?;
        let book_key = DataKey::FlightBook(flight.clone());
        let mut book: FlightBook = env.storage().persistent().get(&book_key).unwrap_or_default();
        let position = book.policies;
        book.policies += 1;
        book.premiums = book
            .premiums
            .checked_add(amount)
            .ok_or(SettlementError::InvalidAmount)?;
        book.exposure = book
            .exposure
            .checked_add(credit)
            .ok_or(SettlementError::InvalidAmount)?;

        // Take the premium into the vault
        let token_client = token::Client::new(&env, &config.asset);
        token_client.transfer(&passenger, &env.current_contract_address(), &amount);

        let policy = Policy {
            passenger: passenger.clone(),
            flight: flight.clone(),
            premium: amount,
            credited: 0,
            withdrawn: false,
            purchased_at: env.ledger().timestamp(),
        };
        env.storage().persistent().set(&key, &policy);
        env.storage()
            .persistent()
            .set(&DataKey::FlightPolicy(flight.clone(), position), &passenger);
        env.storage().persistent().set(&book_key, &book);

        env.events().publish(
            (INSURANCE_BOUGHT,),
            (passenger, flight.code, flight.timestamp, amount),
        );

        Ok(policy)
    }

    /// Settle a flight against its confirmed oracle status.
    ///
    /// Records the outcome once; every policy on a late-airline flight is
    /// then owed its payout and is credited when its passenger claims. Other
    /// statuses owe nothing. Later calls return 0 and change nothing.
    ///
    /// # Returns
    /// Total amount owed to the flight's passengers by this settlement
    ///
    /// # Events
    /// Emits `settled`
    pub fn settle(env: Env, flight: FlightKey) -> Result<i128, SettlementError> {
        let config = Self::config(&env)?;
        Self::require_operational(&env, &config)?;

        let settlement_key = DataKey::Settlement(flight.clone());
        if env.storage().persistent().has(&settlement_key) {
            return Ok(0);
        }

        let status = external::resolved_status(&env, &config.oracle, &flight)
            .ok_or(SettlementError::NotYetResolved)?;

        let book = Self::flight_book(env.clone(), flight.clone());
        let total = if payout::is_compensable(status) {
            book.exposure
        } else {
            0
        };

        let settlement = Settlement {
            status,
            total_credited: total,
            policies: book.policies,
            settled_at: env.ledger().timestamp(),
        };
        env.storage().persistent().set(&settlement_key, &settlement);

        log!(&env, "flight settled", flight.code, status as u32, total);
        env.events().publish(
            (FLIGHT_SETTLED,),
            (flight.code, flight.timestamp, status as u32, total),
        );

        Ok(total)
    }

    /// Credit and withdraw a passenger's payout on a settled flight.
    ///
    /// # Returns
    /// The amount transferred to the passenger
    ///
    /// # Events
    /// Emits `ins_claim`
    pub fn claim(env: Env, passenger: Address, flight: FlightKey) -> Result<i128, SettlementError> {
        passenger.require_auth();
        let config = Self::config(&env)?;
        Self::require_operational(&env, &config)?;

        let key = DataKey::Policy(passenger.clone(), flight.clone());
        let mut policy: Policy = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(SettlementError::NothingOwed)?;

        if policy.withdrawn {
            return Err(SettlementError::NothingOwed);
        }

        // Only a late-airline settlement owes anything
        let settlement = Self::settlement_status(env.clone(), flight.clone())
            .ok_or(SettlementError::NothingOwed)?;
        if !payout::is_compensable(settlement.status) {
            return Err(SettlementError::NothingOwed);
        }
        let owed = payout::payout(policy.premium, config.payout_bps)
            .ok_or(SettlementError::InvalidAmount)?;
        if owed == 0 {
            return Err(SettlementError::NothingOwed);
        }

        let token_client = token::Client::new(&env, &config.asset);
        if token_client.balance(&env.current_contract_address()) < owed {
            return Err(SettlementError::InsufficientLiquidity);
        }

        // Credit and mark withdrawn before paying out
        policy.credited = owed;
        policy.withdrawn = true;
        env.storage().persistent().set(&key, &policy);

        token_client.transfer(&env.current_contract_address(), &passenger, &owed);

        env.events()
            .publish((INSURANCE_CLAIMED,), (passenger, flight.code, owed));

        Ok(owed)
    }

    pub fn get_policy(env: Env, passenger: Address, flight: FlightKey) -> Option<Policy> {
        env.storage()
            .persistent()
            .get(&DataKey::Policy(passenger, flight))
    }

    /// Payout owed to (or already paid to) a passenger on a flight.
    pub fn credited_amount(env: Env, passenger: Address, flight: FlightKey) -> i128 {
        let policy = match Self::get_policy(env.clone(), passenger, flight.clone()) {
            Some(policy) => policy,
            None => return 0,
        };
        if policy.withdrawn {
            return policy.credited;
        }

        let settled_late = Self::settlement_status(env.clone(), flight)
            .map_or(false, |settlement| payout::is_compensable(settlement.status));
        if !settled_late {
            return 0;
        }
        Self::config(&env)
            .ok()
            .and_then(|config| payout::payout(policy.premium, config.payout_bps))
            .unwrap_or(0)
    }

    /// Passengers insured on a flight, in purchase order, `limit` at most
    /// (capped at `MAX_POLICY_PAGE`) starting from position `start`.
    pub fn flight_policies(env: Env, flight: FlightKey, start: u32, limit: u32) -> Vec<Address> {
        let count = Self::flight_book(env.clone(), flight.clone()).policies;
        let end = start
            .saturating_add(limit.min(MAX_POLICY_PAGE))
            .min(count);

        let mut passengers = Vec::new(&env);
        for position in start..end {
            if let Some(passenger) = env
                .storage()
                .persistent()
                .get(&DataKey::FlightPolicy(flight.clone(), position))
            {
                passengers.push_back(passenger);
            }
        }
        passengers
    }

    /// Policy count and premium totals for a flight.
    pub fn flight_book(env: Env, flight: FlightKey) -> FlightBook {
        env.storage()
            .persistent()
            .get(&DataKey::FlightBook(flight))
            .unwrap_or_default()
    }

    pub fn settlement_status(env: Env, flight: FlightKey) -> Option<Settlement> {
        env.storage().persistent().get(&DataKey::Settlement(flight))
    }

    pub fn get_config(env: Env) -> Result<SettlementConfig, SettlementError> {
        Self::config(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, SettlementError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(SettlementError::NotInitialized)
    }

    // Helper functions

    fn config(env: &Env) -> Result<SettlementConfig, SettlementError> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(SettlementError::NotInitialized)
    }

    fn require_operational(env: &Env, config: &SettlementConfig) -> Result<(), SettlementError> {
        if external::is_operational(env, &config.governance) {
            Ok(())
        } else {
            Err(SettlementError::SystemNotOperational)
        }
    }
}

#[cfg(test)]
mod test;
