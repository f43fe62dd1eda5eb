//! Instruction data codec
//!
//! Calls that travel through the multisig are carried as raw instruction data:
//! one discriminator byte followed by little-endian fields. Readers perform
//! bounds checking and return errors on short input.

use crate::error::SaleError;
use pinocchio::pubkey::Pubkey;

/// Read a u8 from instruction data
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8, SaleError> {
    data.get(offset).copied().ok_or(SaleError::InvalidInstruction)
}

/// Read a u64 (little-endian) from instruction data
#[inline]
pub fn read_u64(data: &[u8], offset: usize) -> Result<u64, SaleError> {
    Ok(u64::from_le_bytes(read_bytes::<8>(data, offset)?))
}

/// Read a u128 (little-endian) from instruction data
#[inline]
pub fn read_u128(data: &[u8], offset: usize) -> Result<u128, SaleError> {
    Ok(u128::from_le_bytes(read_bytes::<16>(data, offset)?))
}

/// Read a fixed-size byte array from instruction data
#[inline]
pub fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], SaleError> {
    let end = offset.checked_add(N).ok_or(SaleError::InvalidInstruction)?;
    if end > data.len() {
        return Err(SaleError::InvalidInstruction);
    }
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&data[offset..end]);
    Ok(bytes)
}

/// Instruction data reader with tracked offset
pub struct InstructionReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InstructionReader<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, SaleError> {
        let val = read_u8(self.data, self.offset)?;
        self.offset += 1;
        Ok(val)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, SaleError> {
        let val = read_u64(self.data, self.offset)?;
        self.offset += 8;
        Ok(val)
    }

    #[inline]
    pub fn read_u128(&mut self) -> Result<u128, SaleError> {
        let val = read_u128(self.data, self.offset)?;
        self.offset += 16;
        Ok(val)
    }

    /// Read a 32-byte address and advance offset
    #[inline]
    pub fn read_pubkey(&mut self) -> Result<Pubkey, SaleError> {
        let val = read_bytes::<32>(self.data, self.offset)?;
        self.offset += 32;
        Ok(val)
    }

    /// Fail unless every byte was consumed
    #[inline]
    pub fn finish(&self) -> Result<(), SaleError> {
        if self.remaining() != 0 {
            return Err(SaleError::InvalidInstruction);
        }
        Ok(())
    }
}

/// Builder for instruction data, the inverse of [`InstructionReader`]
#[derive(Default)]
pub struct InstructionWriter {
    data: Vec<u8>,
}

impl InstructionWriter {
    pub fn new(discriminator: u8) -> Self {
        Self { data: vec![discriminator] }
    }

    pub fn u8(mut self, val: u8) -> Self {
        self.data.push(val);
        self
    }

    pub fn u64(mut self, val: u64) -> Self {
        self.data.extend_from_slice(&val.to_le_bytes());
        self
    }

    pub fn u128(mut self, val: u128) -> Self {
        self.data.extend_from_slice(&val.to_le_bytes());
        self
    }

    pub fn pubkey(mut self, val: &Pubkey) -> Self {
        self.data.extend_from_slice(val);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}
