//! Error taxonomy shared by every sale program

use pinocchio::program_error::ProgramError;

/// Typed failure of a sale operation
///
/// Every variant aborts the whole call; no partial state is committed.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SaleError {
    #[error("operation not valid in the current stage")]
    InvalidStage = 0,
    #[error("caller is not authorized")]
    Unauthorized = 1,
    #[error("insufficient balance")]
    InsufficientBalance = 2,
    #[error("amount exceeds the vested withdrawable amount")]
    InsufficientVested = 3,
    #[error("arithmetic overflow")]
    ArithmeticOverflow = 4,
    #[error("transaction already executed")]
    AlreadyExecuted = 5,
    #[error("transaction already confirmed by caller")]
    AlreadyConfirmed = 6,
    #[error("vesting cliff not reached")]
    NotYetVested = 7,
    #[error("transaction not confirmed by caller")]
    NotConfirmed = 8,
    #[error("transaction not found")]
    TransactionNotFound = 9,
    #[error("invalid instruction data")]
    InvalidInstruction = 10,
    #[error("invalid parameter")]
    InvalidParameter = 11,
    #[error("reentrant call")]
    Reentrancy = 12,
    #[error("token transfers are locked until trading starts")]
    TransfersLocked = 13,
    #[error("insufficient allowance")]
    InsufficientAllowance = 14,
    #[error("no contract at destination")]
    UnknownDestination = 15,
    #[error("caller is not an owner")]
    NotOwner = 16,
    #[error("owner already exists")]
    OwnerExists = 17,
    #[error("owner limit reached")]
    OwnerLimit = 18,
    #[error("invalid confirmation requirement")]
    InvalidRequirement = 19,
    #[error("minted distribution does not match total supply")]
    SupplyMismatch = 20,
}

impl SaleError {
    /// Stable numeric code
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl From<SaleError> for ProgramError {
    fn from(e: SaleError) -> Self {
        ProgramError::Custom(e.code())
    }
}

/// Result alias for sale operations
pub type SaleResult<T> = Result<T, SaleError>;

/// Lift an `Option` from the checked arithmetic model into a `SaleResult`
pub trait CheckedExt<T> {
    fn or_overflow(self) -> SaleResult<T>;
}

impl<T> CheckedExt<T> for Option<T> {
    #[inline]
    fn or_overflow(self) -> SaleResult<T> {
        self.ok_or(SaleError::ArithmeticOverflow)
    }
}
