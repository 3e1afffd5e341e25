use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GovernanceError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidConfig = 4,
    AlreadyRegistered = 5,
    DuplicateVote = 6,
    NotEligibleVoter = 7,
    NotActiveAirline = 8,
    AirlineNotRegistered = 9,
    InvalidAmount = 10,
    ModeUnchanged = 11,
    FlightAlreadyRegistered = 12,
    SystemNotOperational = 13,
}
