//! Vesting program entrypoint

use crate::instruction::VestingInstruction;
use crate::state::VestingSchedule;
use dutchsale_common::{Context, SaleResult};
use dutchsale_token::TokenLedger;
use pinocchio::msg;

pub fn process_instruction(
    schedule: &mut VestingSchedule,
    token: &mut TokenLedger,
    ctx: &mut Context,
    instruction_data: &[u8],
) -> SaleResult<()> {
    let instruction = VestingInstruction::unpack(instruction_data).map_err(|e| {
        msg!("Error: Unknown vesting instruction");
        e
    })?;

    match instruction {
        VestingInstruction::Withdraw { destination, amount } => {
            msg!("Instruction: Withdraw");
            schedule.withdraw(ctx, token, destination, amount)
        }
        VestingInstruction::WalletWithdraw => {
            msg!("Instruction: WalletWithdraw");
            schedule.wallet_withdraw(ctx, token).map(|_| ())
        }
        VestingInstruction::Revoke => {
            msg!("Instruction: Revoke");
            schedule.revoke(ctx, token).map(|_| ())
        }
    }
}
