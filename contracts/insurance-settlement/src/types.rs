use soroban_sdk::{contracttype, Address, String};

/// Largest premium a passenger may pay per flight (1 unit at 7 decimals).
pub const DEFAULT_PREMIUM_CAP: i128 = 10_000_000;

/// Payout on a late-airline flight, in basis points of the premium (1.5x).
pub const DEFAULT_PAYOUT_BPS: u32 = 15_000;

pub const BPS_DENOMINATOR: i128 = 10_000;

/// Most passengers returned by one `flight_policies` page.
pub const MAX_POLICY_PAGE: u32 = 50;

/// Deployment parameters, fixed at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementConfig {
    /// Token premiums and payouts are denominated in
    pub asset: Address,
    /// FlightOracle contract
    pub oracle: Address,
    /// AirlineGovernance contract
    pub governance: Address,
    pub premium_cap: i128,
    pub payout_bps: u32,
}

/// Local mirror of AirlineGovernance's FlightKey for cross-contract calls.
/// Field names and types must match the governance definition exactly.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlightKey {
    pub airline: String,
    pub code: String,
    pub timestamp: u64,
}

/// Local mirror of FlightOracle's StatusCode.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum StatusCode {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

/// One passenger's cover on one flight.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Policy {
    pub passenger: Address,
    pub flight: FlightKey,
    pub premium: i128,
    /// Payout paid out; written at most once, by the claim
    pub credited: i128,
    pub withdrawn: bool,
    pub purchased_at: u64,
}

/// Running totals for the policies sold on one flight.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FlightBook {
    pub policies: u32,
    pub premiums: i128,
    /// Sum of each policy's payout if the flight settles late-airline
    pub exposure: i128,
}

/// Outcome of settling a flight. Policies are credited from this record when
/// their passengers claim.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub status: StatusCode,
    pub total_credited: i128,
    pub policies: u32,
    pub settled_at: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    Policy(Address, FlightKey),
    FlightBook(FlightKey),
    /// (flight, position) -> passenger, in purchase order
    FlightPolicy(FlightKey, u32),
    Settlement(FlightKey),
}
