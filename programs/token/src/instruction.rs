//! Token instruction codec

use dutchsale_common::{InstructionReader, InstructionWriter, Pubkey, SaleError};

/// Token instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenInstruction {
    /// Move tokens from the caller
    Transfer { to: Pubkey, amount: u128 },
    /// Set a spender allowance on the caller's balance
    Approve { spender: Pubkey, amount: u128 },
    /// Spend an allowance granted by `from`
    TransferFrom { from: Pubkey, to: Pubkey, amount: u128 },
}

impl TokenInstruction {
    pub fn pack(&self) -> Vec<u8> {
        match self {
            Self::Transfer { to, amount } => InstructionWriter::new(0).pubkey(to).u128(*amount).build(),
            Self::Approve { spender, amount } => {
                InstructionWriter::new(1).pubkey(spender).u128(*amount).build()
            }
            Self::TransferFrom { from, to, amount } => InstructionWriter::new(2)
                .pubkey(from)
                .pubkey(to)
                .u128(*amount)
                .build(),
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, SaleError> {
        let mut reader = InstructionReader::new(data);
        let ix = match reader.read_u8()? {
            0 => Self::Transfer {
                to: reader.read_pubkey()?,
                amount: reader.read_u128()?,
            },
            1 => Self::Approve {
                spender: reader.read_pubkey()?,
                amount: reader.read_u128()?,
            },
            2 => Self::TransferFrom {
                from: reader.read_pubkey()?,
                to: reader.read_pubkey()?,
                amount: reader.read_u128()?,
            },
            _ => return Err(SaleError::InvalidInstruction),
        };
        reader.finish()?;
        Ok(ix)
    }
}
