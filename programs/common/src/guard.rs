//! Non-reentrancy guard for stateful programs

use crate::error::{SaleError, SaleResult};

/// Busy flag held for the duration of a public operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Mark the program busy; fails if a call is already in progress
    pub fn enter(&mut self) -> SaleResult<()> {
        if self.entered {
            pinocchio::msg!("Error: Reentrant call rejected");
            return Err(SaleError::Reentrancy);
        }
        self.entered = true;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.entered = false;
    }
}
