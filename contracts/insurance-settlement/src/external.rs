//! Read-only calls into the oracle and governance contracts.
//!
//! Only non-failing views are used so a domain error on the other side can
//! never trap a settlement call.

use soroban_sdk::{Address, Env, IntoVal, Symbol, Val, Vec};

use crate::types::{FlightKey, StatusCode};

pub fn is_operational(env: &Env, governance: &Address) -> bool {
    let args: Vec<Val> = Vec::new(env);
    env.invoke_contract(governance, &Symbol::new(env, "is_operational"), args)
}

pub fn is_flight_registered(env: &Env, governance: &Address, flight: &FlightKey) -> bool {
    let args: Vec<Val> = Vec::from_array(env, [flight.clone().into_val(env)]);
    env.invoke_contract(governance, &Symbol::new(env, "is_flight_registered"), args)
}

/// Confirmed oracle status for the flight's (code, timestamp) request.
pub fn resolved_status(env: &Env, oracle: &Address, flight: &FlightKey) -> Option<StatusCode> {
    let args: Vec<Val> = Vec::from_array(
        env,
        [
            flight.code.clone().into_val(env),
            flight.timestamp.into_val(env),
        ],
    );
    env.invoke_contract(oracle, &Symbol::new(env, "resolved_status"), args)
}
