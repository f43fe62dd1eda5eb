//! Vesting release curves

use crate::math::*;

/// Release shape over the vesting period
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VestingCurve {
    /// Continuous linear release, one base unit of time at a time
    Linear,
    /// Linear release quantized down to whole steps of `step_secs`
    Stepped { step_secs: u64 },
}

impl Default for VestingCurve {
    fn default() -> Self {
        VestingCurve::Linear
    }
}

/// Amount of `total` vested after `elapsed` seconds of a `period`-second schedule
///
/// Returns 0 before `cliff`, `total` once the period is over.
pub fn vested_amount(
    total: u128,
    elapsed: u64,
    cliff: u64,
    period: u64,
    curve: VestingCurve,
) -> Option<u128> {
    if elapsed < cliff {
        return Some(0);
    }
    if period == 0 || elapsed >= period {
        return Some(total);
    }

    let effective = match curve {
        VestingCurve::Linear => elapsed,
        VestingCurve::Stepped { step_secs } if step_secs > 0 => elapsed - elapsed % step_secs,
        VestingCurve::Stepped { .. } => elapsed,
    };

    mul_div_floor(total, effective as u128, period as u128)
}

/// Withdrawable now: vested minus already withdrawn, bounded by what is still held
pub fn withdrawable(vested: u128, withdrawn: u128, held: u128) -> u128 {
    min_u128(vested.saturating_sub(withdrawn), held)
}
