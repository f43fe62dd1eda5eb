//! Auction program entrypoint

use crate::instruction::AuctionInstruction;
use crate::state::DutchAuction;
use dutchsale_common::{Context, SaleError, SaleResult};
use dutchsale_token::TokenLedger;
use pinocchio::msg;

/// Process an auction instruction on behalf of `ctx.caller`
///
/// `token` is the ledger of the token being sold.
pub fn process_instruction(
    auction: &mut DutchAuction,
    token: &mut TokenLedger,
    ctx: &mut Context,
    instruction_data: &[u8],
) -> SaleResult<()> {
    let instruction = AuctionInstruction::unpack(instruction_data).map_err(|e| {
        msg!("Error: Unknown auction instruction");
        e
    })?;

    match instruction {
        AuctionInstruction::Setup { token: token_address, wallet } => {
            msg!("Instruction: Setup");
            if token_address != token.address {
                return Err(SaleError::InvalidParameter);
            }
            auction.setup(ctx, token, wallet)
        }
        AuctionInstruction::ChangeSettings { ceiling, price_factor } => {
            msg!("Instruction: ChangeSettings");
            auction.change_settings(ctx, ceiling, price_factor)
        }
        AuctionInstruction::StartAuction => {
            msg!("Instruction: StartAuction");
            auction.start_auction(ctx)
        }
        AuctionInstruction::Bid { amount } => {
            msg!("Instruction: Bid");
            auction.bid(ctx, token, amount).map(|_| ())
        }
        AuctionInstruction::ClaimTokens { bidder } => {
            msg!("Instruction: ClaimTokens");
            auction.claim_tokens(ctx, token, bidder).map(|_| ())
        }
        AuctionInstruction::UpdateStage => {
            msg!("Instruction: UpdateStage");
            auction.update_stage(ctx, token).map(|_| ())
        }
    }
}
