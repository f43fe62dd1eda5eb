//! Dutchsale Token Program
//!
//! Fixed-supply balance table for the sale token.
//!
//! ## Instructions
//!
//! - **Transfer** (0): Move tokens from the caller
//! - **Approve** (1): Set a spender allowance
//! - **TransferFrom** (2): Spend an allowance
//!
//! Supply is minted once, at construction: the auction receives the tokens it
//! sells and the pre-assigned grants receive the rest. Holder transfers stay
//! locked until the auction unlocks trading.

pub mod entrypoint;
pub mod instruction;
pub mod state;

pub use instruction::TokenInstruction;
pub use state::TokenLedger;
