use soroban_sdk::{contracttype, Address, String};

/// Funding an airline must reach before it participates (10 units at 7 decimals).
pub const DEFAULT_FUNDING_THRESHOLD: i128 = 100_000_000;

/// Active airlines needed before admission switches from sponsorship to voting.
pub const DEFAULT_CONSENSUS_FLOOR: u32 = 4;

/// Deployment parameters, fixed at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernanceConfig {
    /// Token airlines fund in
    pub asset: Address,
    /// Where airline funding is forwarded (the settlement contract)
    pub vault: Address,
    pub funding_threshold: i128,
    pub consensus_floor: u32,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RegistrationStatus {
    Proposed = 0,
    Registered = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Airline {
    pub name: String,
    pub address: Address,
    pub funding: i128,
    pub status: RegistrationStatus,
    /// Set once funding reaches the threshold; never cleared
    pub active: bool,
    pub registered_at: u64,
}

/// Flights are keyed by airline name, flight code and departure timestamp.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlightKey {
    pub airline: String,
    pub code: String,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Flight {
    pub key: FlightKey,
    pub registered_by: Address,
    pub registered_at: u64,
}

/// What a ballot is about. The operational-mode key carries the target value,
/// so votes to pause and votes to resume are tallied separately.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProposalKey {
    AirlineAdmission(String),
    OperationalMode(bool),
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Config,
    Operational,
    AdminCount,
    RegisteredAirlineCount,
    ActiveAirlineCount,
    Admin(Address),
    Airline(String),
    AirlineByAddress(Address),
    Ballot(ProposalKey),
    Flight(FlightKey),
    /// (code, timestamp) -> name of the airline holding that status slot
    FlightSlot(String, u64),
}
