//! Auction instruction codec

use dutchsale_common::{InstructionReader, InstructionWriter, Pubkey, SaleError};

/// Auction instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionInstruction {
    /// Bind token and wallet
    Setup { token: Pubkey, wallet: Pubkey },
    /// Replace ceiling and price factor
    ChangeSettings { ceiling: u128, price_factor: u128 },
    StartAuction,
    /// Bid `amount` of native currency
    Bid { amount: u128 },
    /// Pay out tokens owed to `bidder`
    ClaimTokens { bidder: Pubkey },
    UpdateStage,
}

impl AuctionInstruction {
    pub fn pack(&self) -> Vec<u8> {
        match self {
            Self::Setup { token, wallet } => InstructionWriter::new(0).pubkey(token).pubkey(wallet).build(),
            Self::ChangeSettings { ceiling, price_factor } => InstructionWriter::new(1)
                .u128(*ceiling)
                .u128(*price_factor)
                .build(),
            Self::StartAuction => InstructionWriter::new(2).build(),
            Self::Bid { amount } => InstructionWriter::new(3).u128(*amount).build(),
            Self::ClaimTokens { bidder } => InstructionWriter::new(4).pubkey(bidder).build(),
            Self::UpdateStage => InstructionWriter::new(5).build(),
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, SaleError> {
        let mut reader = InstructionReader::new(data);
        let ix = match reader.read_u8()? {
            0 => Self::Setup {
                token: reader.read_pubkey()?,
                wallet: reader.read_pubkey()?,
            },
            1 => Self::ChangeSettings {
                ceiling: reader.read_u128()?,
                price_factor: reader.read_u128()?,
            },
            2 => Self::StartAuction,
            3 => Self::Bid { amount: reader.read_u128()? },
            4 => Self::ClaimTokens { bidder: reader.read_pubkey()? },
            5 => Self::UpdateStage,
            _ => return Err(SaleError::InvalidInstruction),
        };
        reader.finish()?;
        Ok(ix)
    }
}
