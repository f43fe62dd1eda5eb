//! Shared types for the dutchsale programs
//!
//! Addresses, the per-call execution context, the error taxonomy, the
//! instruction codec and the non-reentrancy guard.

pub mod context;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod instruction;

pub use context::*;
pub use dispatch::*;
pub use error::*;
pub use guard::*;
pub use instruction::*;

pub use model_safety::{MAX_TOKENS_SOLD, PRICE_OFFSET, STOP_PRICE_DIVISOR, UNIT};
pub use pinocchio::pubkey::Pubkey;

/// Total token supply, minted once at ledger construction
pub const TOTAL_TOKENS: u128 = 10_000_000 * UNIT;

/// Seconds between auction end and the start of trading
pub const WAITING_PERIOD: u64 = 60 * 60 * 24 * 7;

/// Seconds in a (non-leap) year
pub const ONE_YEAR: u64 = 60 * 60 * 24 * 365;

/// Seconds in a day
pub const ONE_DAY: u64 = 60 * 60 * 24;
