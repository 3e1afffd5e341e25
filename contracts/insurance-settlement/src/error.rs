use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SettlementError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidConfig = 3,
    InvalidAmount = 4,
    ExceedsPremiumCap = 5,
    SystemNotOperational = 6,
    FlightNotRegistered = 7,
    StatusAlreadyResolved = 8,
    AlreadyInsured = 9,
    NotYetResolved = 10,
    NothingOwed = 11,
    InsufficientLiquidity = 12,
}
