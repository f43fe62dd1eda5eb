//! Dutchsale Vesting Program
//!
//! Releases a pre-assigned token grant to one beneficiary over time. The
//! grant is whatever the schedule's address holds when it is created.
//!
//! ## Instructions
//!
//! - **Withdraw** (0): Beneficiary takes vested tokens
//! - **WalletWithdraw** (1): Wallet takes everything currently vested
//! - **Revoke** (2): Wallet sweeps every held token

pub mod entrypoint;
pub mod instruction;
pub mod state;

pub use instruction::VestingInstruction;
pub use state::*;
