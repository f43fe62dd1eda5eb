//! Vesting instruction codec

use dutchsale_common::{InstructionReader, InstructionWriter, Pubkey, SaleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VestingInstruction {
    Withdraw { destination: Pubkey, amount: u128 },
    WalletWithdraw,
    Revoke,
}

impl VestingInstruction {
    pub fn pack(&self) -> Vec<u8> {
        match self {
            Self::Withdraw { destination, amount } => InstructionWriter::new(0)
                .pubkey(destination)
                .u128(*amount)
                .build(),
            Self::WalletWithdraw => InstructionWriter::new(1).build(),
            Self::Revoke => InstructionWriter::new(2).build(),
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, SaleError> {
        let mut reader = InstructionReader::new(data);
        let ix = match reader.read_u8()? {
            0 => Self::Withdraw {
                destination: reader.read_pubkey()?,
                amount: reader.read_u128()?,
            },
            1 => Self::WalletWithdraw,
            2 => Self::Revoke,
            _ => return Err(SaleError::InvalidInstruction),
        };
        reader.finish()?;
        Ok(ix)
    }
}
