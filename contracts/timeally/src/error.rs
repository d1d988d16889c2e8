use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TimeAllyError {
    UnknownPlan = 1,
    UnknownPosition = 2,
    NotOwner = 3,
    InvalidAmount = 4,
    InvalidState = 5,
    ExceedsPrincipal = 6,
    LengthMismatch = 7,
    TotalMismatch = 8,
    InsufficientFunds = 9,
    InsufficientAllowance = 10,
    NoActiveDistribution = 11,
    AlreadyInitialized = 100,
    NotInitialized = 101,
    ArithmeticOverflow = 102,
    SharedCustodyToken = 103,
}
