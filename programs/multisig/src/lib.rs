//! Dutchsale Multisig Program
//!
//! M-of-N authorization queue. Owners submit calls, other owners confirm them,
//! and a call is forwarded to its destination once enough distinct owners
//! have confirmed.
//!
//! ## Self-calls (destination == wallet address)
//!
//! - **AddOwner** (0)
//! - **RemoveOwner** (1)
//! - **ReplaceOwner** (2)
//! - **ChangeRequirement** (3)
//! - **ChangeDailyLimit** (4)
//!
//! Value-only transactions (empty payload) within the daily limit execute on
//! a single confirmation.

pub mod entrypoint;
pub mod instruction;
pub mod state;

pub use instruction::MultisigInstruction;
pub use state::*;
