use soroban_sdk::{contracttype, Address, Map, String, Vec};

/// Fee charged once per oracle registration (1 unit at 7 decimals).
pub const DEFAULT_REGISTRATION_FEE: i128 = 10_000_000;

/// Number of shard buckets an index is drawn from.
pub const DEFAULT_INDEX_RANGE: u32 = 10;

/// Widest shard range accepted; the coverage table holds one entry per index.
pub const MAX_INDEX_RANGE: u32 = 256;

/// Identical reports needed before a status is accepted.
pub const DEFAULT_QUORUM: u32 = 3;

/// Indices assigned to every oracle.
pub const INDEXES_PER_ORACLE: u32 = 3;

/// Flight status codes reported by oracles.
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

impl StatusCode {
    /// Map a raw reported code onto the standard set.
    pub fn from_code(code: u32) -> Option<StatusCode> {
        match code {
            0 => Some(StatusCode::Unknown),
            10 => Some(StatusCode::OnTime),
            20 => Some(StatusCode::LateAirline),
            30 => Some(StatusCode::LateWeather),
            40 => Some(StatusCode::LateTechnical),
            50 => Some(StatusCode::LateOther),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Deployment parameters, fixed at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleConfig {
    /// Token the registration fee is paid in
    pub fee_token: Address,
    pub registration_fee: i128,
    /// Indices are drawn from `[0, index_range)`
    pub index_range: u32,
    pub quorum: u32,
}

/// A registered oracle and its shard coverage.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Oracle {
    pub address: Address,
    pub indexes: Vec<u32>,
    pub registered_at: u64,
}

/// Aggregate of every report submitted for one (flight, timestamp).
#[contracttype]
#[derive(Clone, Debug)]
pub struct StatusRequest {
    pub flight: String,
    pub timestamp: u64,
    pub requester: Address,
    /// Shard index oracles must cover to answer this round
    pub index: u32,
    /// Bumped on every reissue; responses reset with it
    pub round: u32,
    /// oracle -> reported code
    pub responses: Map<Address, u32>,
    /// reported code -> number of oracles
    pub tally: Map<u32, u32>,
    pub resolved: Option<StatusCode>,
    pub opened_at: u64,
}

/// Notification handed back to the requester and published as `or_req`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleRequest {
    pub index: u32,
    pub flight: String,
    pub timestamp: u64,
    pub round: u32,
    /// Registered oracles covering `index` when the request was issued
    pub coverage: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    OracleCount,
    /// Registered oracles per shard index, `index_range` entries
    Coverage,
    Oracle(Address),
    Request(String, u64),
}
