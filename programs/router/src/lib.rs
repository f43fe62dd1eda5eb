//! Dutchsale Router
//!
//! In-memory execution ledger for the sale programs. Deploys the token,
//! multisig wallet, auction and vesting schedules, owns the clock and the
//! native balance table, and runs every call atomically: a call that fails
//! leaves no trace.
//!
//! Calls are addressed by destination. Raw instruction data sent to a
//! program address is decoded by that program's entrypoint, the same way
//! the multisig forwards confirmed transactions.

pub mod config;
pub mod ledger;
pub mod pda;
pub mod targets;

pub use config::*;
pub use ledger::*;
pub use pda::*;
pub use targets::*;
