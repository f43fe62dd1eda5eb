//! Multisig self-call instruction codec

use dutchsale_common::{InstructionReader, InstructionWriter, Pubkey, SaleError};

/// Wallet administration, only reachable through a confirmed self-call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultisigInstruction {
    AddOwner { owner: Pubkey },
    RemoveOwner { owner: Pubkey },
    ReplaceOwner { owner: Pubkey, new_owner: Pubkey },
    ChangeRequirement { required: u64 },
    ChangeDailyLimit { daily_limit: u128 },
}

impl MultisigInstruction {
    pub fn pack(&self) -> Vec<u8> {
        match self {
            Self::AddOwner { owner } => InstructionWriter::new(0).pubkey(owner).build(),
            Self::RemoveOwner { owner } => InstructionWriter::new(1).pubkey(owner).build(),
            Self::ReplaceOwner { owner, new_owner } => {
                InstructionWriter::new(2).pubkey(owner).pubkey(new_owner).build()
            }
            Self::ChangeRequirement { required } => InstructionWriter::new(3).u64(*required).build(),
            Self::ChangeDailyLimit { daily_limit } => {
                InstructionWriter::new(4).u128(*daily_limit).build()
            }
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, SaleError> {
        let mut reader = InstructionReader::new(data);
        let ix = match reader.read_u8()? {
            0 => Self::AddOwner { owner: reader.read_pubkey()? },
            1 => Self::RemoveOwner { owner: reader.read_pubkey()? },
            2 => Self::ReplaceOwner {
                owner: reader.read_pubkey()?,
                new_owner: reader.read_pubkey()?,
            },
            3 => Self::ChangeRequirement { required: reader.read_u64()? },
            4 => Self::ChangeDailyLimit { daily_limit: reader.read_u128()? },
            _ => return Err(SaleError::InvalidInstruction),
        };
        reader.finish()?;
        Ok(ix)
    }
}
