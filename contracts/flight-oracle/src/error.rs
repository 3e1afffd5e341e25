use soroban_sdk::contracterror;

/// Contract errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum OracleError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidConfig = 4,
    InsufficientFee = 5,
    AlreadyRegistered = 6,
    UnknownOracle = 7,
    IndexMismatch = 8,
    AlreadyResolved = 9,
    NotYetResolved = 10,
    InvalidStatusCode = 11,
    RequestNotOpen = 12,
    InsufficientCoverage = 13,
    InvalidAmount = 14,
    /// Client-side: the host rejected the call before the contract answered
    RequestFailed = 15,
}
