//! Call targets reachable by address

use dutchsale_auction::DutchAuction;
use dutchsale_common::{Context, Dispatch, Pubkey, SaleError, SaleResult, Transferable};
use dutchsale_token::TokenLedger;
use dutchsale_vesting::VestingSchedule;
use pinocchio::msg;
use std::collections::BTreeMap;

/// Programs a forwarded call may land on
///
/// The multisig wallet is not in here: it is the one doing the forwarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    pub token: TokenLedger,
    pub auction: DutchAuction,
    pub vestings: BTreeMap<Pubkey, VestingSchedule>,
}

impl Targets {
    pub fn is_program(&self, address: &Pubkey) -> bool {
        *address == self.token.address
            || *address == self.auction.address
            || self.vestings.contains_key(address)
    }

    /// Move `value` to `destination`, then run `payload` there
    ///
    /// An empty payload is a plain value transfer and may go to any address
    /// that is not a program. Programs never take native value with a call:
    /// bids move currency through the auction itself.
    fn route(&mut self, ctx: &mut Context, destination: &Pubkey, value: u128, payload: &[u8]) -> SaleResult<()> {
        let program = self.is_program(destination);
        if program && value > 0 {
            msg!("Error: Programs do not accept native value");
            return Err(SaleError::InvalidParameter);
        }
        if !payload.is_empty() && !program {
            msg!("Error: Unknown call destination");
            return Err(SaleError::UnknownDestination);
        }

        let caller = ctx.caller;
        ctx.native.transfer(&caller, destination, value)?;
        if payload.is_empty() {
            return Ok(());
        }

        if *destination == self.token.address {
            dutchsale_token::entrypoint::process_instruction(&mut self.token, ctx, payload)
        } else if *destination == self.auction.address {
            dutchsale_auction::entrypoint::process_instruction(&mut self.auction, &mut self.token, ctx, payload)
        } else {
            let schedule = self.vestings.get_mut(destination).ok_or(SaleError::UnknownDestination)?;
            dutchsale_vesting::entrypoint::process_instruction(schedule, &mut self.token, ctx, payload)
        }
    }
}

impl Dispatch for Targets {
    fn dispatch(
        &mut self,
        ctx: &mut Context,
        destination: &Pubkey,
        value: u128,
        payload: &[u8],
    ) -> SaleResult<()> {
        let programs = self.clone();
        let native = ctx.native.clone();

        let result = self.route(ctx, destination, value, payload);
        if result.is_err() {
            *self = programs;
            *ctx.native = native;
        }
        result
    }
}
