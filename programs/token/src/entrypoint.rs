//! Token program entrypoint

use crate::instruction::TokenInstruction;
use crate::state::TokenLedger;
use dutchsale_common::{Context, SaleResult};
use pinocchio::msg;

/// Process a token instruction on behalf of `ctx.caller`
pub fn process_instruction(
    ledger: &mut TokenLedger,
    ctx: &mut Context,
    instruction_data: &[u8],
) -> SaleResult<()> {
    let instruction = TokenInstruction::unpack(instruction_data).map_err(|e| {
        msg!("Error: Unknown token instruction");
        e
    })?;

    match instruction {
        TokenInstruction::Transfer { to, amount } => {
            msg!("Instruction: Transfer");
            ledger.transfer_as(&ctx.caller, &to, amount)
        }
        TokenInstruction::Approve { spender, amount } => {
            msg!("Instruction: Approve");
            ledger.approve(&ctx.caller, &spender, amount)
        }
        TokenInstruction::TransferFrom { from, to, amount } => {
            msg!("Instruction: TransferFrom");
            ledger.transfer_from(&ctx.caller, &from, &to, amount)
        }
    }
}
