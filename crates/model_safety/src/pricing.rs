//! Dutch auction price curves
//!
//! All functions are total: overflow and division by zero come back as `None`
//! so callers can turn them into a typed error instead of wrapping.

use crate::math::*;

/// Token base-unit scale (18 decimals)
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Added to elapsed blocks so the price stays finite at the start block
pub const PRICE_OFFSET: u128 = 7_500;

/// Tokens offered in the auction, in base units
pub const MAX_TOKENS_SOLD: u128 = 9_000_000 * UNIT;

/// `MAX_TOKENS_SOLD / UNIT`: converts raised currency into a per-token stop price
pub const STOP_PRICE_DIVISOR: u128 = MAX_TOKENS_SOLD / UNIT;

/// Current token price: `price_factor * UNIT / (elapsed + PRICE_OFFSET) + 1`
pub fn token_price(price_factor: u128, elapsed_blocks: u64) -> Option<u128> {
    let numerator = mul_u128(price_factor, UNIT)?;
    let denominator = add_u128(elapsed_blocks as u128, PRICE_OFFSET)?;
    add_u128(div_u128(numerator, denominator)?, 1)
}

/// Price implied by funds raised so far: `total_received / STOP_PRICE_DIVISOR + 1`
pub fn stop_price(total_received: u128) -> Option<u128> {
    add_u128(div_u128(total_received, STOP_PRICE_DIVISOR)?, 1)
}

/// Largest amount that can still be accepted at `price` without selling more
/// than `MAX_TOKENS_SOLD` or raising more than `ceiling`
pub fn max_acceptable_bid(price: u128, total_received: u128, ceiling: u128) -> Option<u128> {
    let by_supply = sub_u128(mul_u128(STOP_PRICE_DIVISOR, price)?, total_received)?;
    let by_ceiling = sub_u128(ceiling, total_received)?;
    Some(min_u128(by_supply, by_ceiling))
}

/// Tokens owed for `contribution` at `final_price`: `contribution * UNIT / final_price`
pub fn tokens_for(contribution: u128, final_price: u128) -> Option<u128> {
    mul_div_floor(contribution, UNIT, final_price)
}

/// True once the raised funds price the remaining supply at or above the curve
pub fn stop_reached(price_factor: u128, elapsed_blocks: u64, total_received: u128) -> Option<bool> {
    Some(stop_price(total_received)? >= token_price(price_factor, elapsed_blocks)?)
}
