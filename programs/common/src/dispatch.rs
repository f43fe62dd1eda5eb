//! Forwarding authorized calls to other programs

use crate::context::Context;
use crate::error::SaleResult;
use pinocchio::pubkey::Pubkey;

/// Executes an encoded call at a destination address
///
/// The multisig forwards confirmed transactions through this trait. The
/// implementor resolves `destination` to one of the deployed programs, moves
/// `value` native currency from `ctx.caller` to the destination, and runs
/// `payload` there with `ctx.caller` as the caller.
///
/// An `Err` must leave every balance and program state as it was.
pub trait Dispatch {
    fn dispatch(
        &mut self,
        ctx: &mut Context,
        destination: &Pubkey,
        value: u128,
        payload: &[u8],
    ) -> SaleResult<()>;
}
