//! Dutchsale Auction Program
//!
//! Dutch auction selling `MAX_TOKENS_SOLD` against a falling price.
//!
//! ## Instructions
//!
//! - **Setup** (0): Bind token and wallet (owner only)
//! - **ChangeSettings** (1): Set ceiling and price factor (wallet only, before start)
//! - **StartAuction** (2): Open bidding (wallet only)
//! - **Bid** (3): Contribute sale currency
//! - **ClaimTokens** (4): Pay out a bidder's tokens at the final price
//! - **UpdateStage** (5): Apply time-driven stage transitions
//!
//! ## Pricing
//!
//! ```text
//! token price = price_factor * 1e18 / (elapsed_blocks + 7500) + 1
//! stop price  = total_received / 9_000_000 + 1
//! ```
//!
//! The auction ends when the stop price meets the token price, either inside
//! the bid that crosses it or lazily on the next stage update.

pub mod entrypoint;
pub mod instruction;
pub mod state;

pub use instruction::AuctionInstruction;
pub use state::*;
