//! Execution context handed to every sale operation
//!
//! The surrounding ledger supplies the caller, the clock and native currency
//! balances. Nothing here is ambient: each operation gets them explicitly.

use crate::error::{SaleError, SaleResult};
use pinocchio::pubkey::Pubkey;
use std::collections::BTreeMap;

/// Block ordinal and wall-clock time of the call being processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    /// Current block ordinal
    pub block: u64,
    /// Current timestamp (seconds)
    pub timestamp: u64,
}

/// Anything that moves balances between addresses
///
/// Implemented by the native currency table and the sale token ledger.
pub trait Transferable {
    fn balance_of(&self, owner: &Pubkey) -> u128;

    /// Move `amount` from `from` to `to`; all-or-nothing
    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> SaleResult<()>;
}

/// Native currency balances held by the surrounding ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeBalances {
    balances: BTreeMap<Pubkey, u128>,
}

impl NativeBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a balance (ledger-level funding, not a transfer)
    pub fn set_balance(&mut self, owner: Pubkey, amount: u128) {
        if amount == 0 {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, amount);
        }
    }
}

impl Transferable for NativeBalances {
    fn balance_of(&self, owner: &Pubkey) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> SaleResult<()> {
        let from_balance = self.balance_of(from);
        if amount > from_balance {
            return Err(SaleError::InsufficientBalance);
        }
        if from == to || amount == 0 {
            return Ok(());
        }
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(SaleError::ArithmeticOverflow)?;

        self.set_balance(*from, from_balance - amount);
        self.set_balance(*to, to_balance);
        Ok(())
    }
}

/// Per-call context: who is calling, when, and the native balance table
pub struct Context<'a> {
    pub caller: Pubkey,
    pub clock: Clock,
    pub native: &'a mut NativeBalances,
}

impl<'a> Context<'a> {
    pub fn new(caller: Pubkey, clock: Clock, native: &'a mut NativeBalances) -> Self {
        Self { caller, clock, native }
    }

    /// Reborrow this context with a different caller (a contract forwarding a call)
    pub fn as_caller(&mut self, caller: Pubkey) -> Context<'_> {
        Context {
            caller,
            clock: self.clock,
            native: &mut *self.native,
        }
    }
}
