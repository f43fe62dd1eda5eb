//! Pure Rust arithmetic model for the token sale
//! No ledger dependencies, no unwrap/panic, all functions total

pub mod math;
pub mod pricing;
pub mod vesting;

// Re-export commonly used items
pub use pricing::*;
pub use vesting::*;
