//! Multisig program entrypoint

use crate::state::MultisigGate;
use dutchsale_common::{Context, SaleResult};
use pinocchio::msg;

/// Process a wallet administration instruction sent directly to the wallet
///
/// Only the wallet itself may administer the wallet, so direct calls from
/// owners are rejected; owners go through `submit_transaction` instead.
pub fn process_instruction(
    gate: &mut MultisigGate,
    ctx: &mut Context,
    instruction_data: &[u8],
) -> SaleResult<()> {
    if instruction_data.is_empty() {
        msg!("Error: Instruction data is empty");
        return Err(dutchsale_common::SaleError::InvalidInstruction);
    }
    msg!("Instruction: WalletAdmin");
    gate.process_admin(&ctx.caller, instruction_data)
}
