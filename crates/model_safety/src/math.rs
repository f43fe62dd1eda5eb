//! Checked arithmetic helpers - no unwrap, no panics, no wrapping

/// Add u128, `None` on overflow
pub fn add_u128(a: u128, b: u128) -> Option<u128> {
    a.checked_add(b)
}

/// Subtract u128, `None` on underflow
pub fn sub_u128(a: u128, b: u128) -> Option<u128> {
    a.checked_sub(b)
}

/// Multiply u128, `None` on overflow
pub fn mul_u128(a: u128, b: u128) -> Option<u128> {
    a.checked_mul(b)
}

/// Divide u128 (floor), `None` if divisor is 0
pub fn div_u128(a: u128, b: u128) -> Option<u128> {
    a.checked_div(b)
}

/// Minimum of two u128
pub fn min_u128(a: u128, b: u128) -> u128 {
    if a < b { a } else { b }
}

/// Full 256-bit product of two u128 values as (high, low) halves
pub fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;

    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    // Each partial product fits in u128 since both factors are < 2^64
    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    // At most 3 * (2^64 - 1), no overflow
    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);

    let lo = (ll & MASK) | (mid << 64);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}

/// Divide a 256-bit value (hi, lo) by `d`
///
/// Returns `None` if `d == 0` or the quotient does not fit in u128.
pub fn div_wide(hi: u128, lo: u128, d: u128) -> Option<u128> {
    if d == 0 || hi >= d {
        return None;
    }
    if hi == 0 {
        return Some(lo / d);
    }

    // Restoring long division, one bit of `lo` per step. `rem < d` holds at
    // the top of every iteration, so the quotient has at most 128 bits.
    let mut rem = hi;
    let mut quot: u128 = 0;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        quot <<= 1;
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quot |= 1;
        }
    }
    Some(quot)
}

/// floor(a * b / d) with a 256-bit intermediate
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Option<u128> {
    let (hi, lo) = widening_mul(a, b);
    div_wide(hi, lo, d)
}
