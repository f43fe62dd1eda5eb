//! Token ledger state

use dutchsale_common::{
    Pubkey, SaleError, SaleResult, Transferable, MAX_TOKENS_SOLD, TOTAL_TOKENS,
};
use pinocchio::msg;
use std::collections::BTreeMap;

/// Fixed-supply token balances
///
/// The sum of all balances equals `total_supply` at every observation point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLedger {
    /// Address of this ledger
    pub address: Pubkey,
    /// Holder allowed to move tokens before trading starts (the auction)
    distributor: Pubkey,
    total_supply: u128,
    balances: BTreeMap<Pubkey, u128>,
    allowances: BTreeMap<(Pubkey, Pubkey), u128>,
    trading_unlocked: bool,
}

impl TokenLedger {
    /// Mint the whole supply
    ///
    /// `distributor` receives `MAX_TOKENS_SOLD`; `grants` must cover exactly
    /// `TOTAL_TOKENS - MAX_TOKENS_SOLD`.
    pub fn new(address: Pubkey, distributor: Pubkey, grants: &[(Pubkey, u128)]) -> SaleResult<Self> {
        let mut balances = BTreeMap::new();
        balances.insert(distributor, MAX_TOKENS_SOLD);

        let mut granted: u128 = 0;
        for (owner, amount) in grants {
            granted = granted.checked_add(*amount).ok_or(SaleError::ArithmeticOverflow)?;
            let entry = balances.entry(*owner).or_insert(0u128);
            *entry = entry.checked_add(*amount).ok_or(SaleError::ArithmeticOverflow)?;
        }

        if granted != TOTAL_TOKENS - MAX_TOKENS_SOLD {
            msg!("Error: Pre-assigned grants do not match reserved supply");
            return Err(SaleError::SupplyMismatch);
        }

        Ok(Self {
            address,
            distributor,
            total_supply: TOTAL_TOKENS,
            balances,
            allowances: BTreeMap::new(),
            trading_unlocked: false,
        })
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn distributor(&self) -> Pubkey {
        self.distributor
    }

    pub fn is_trading_unlocked(&self) -> bool {
        self.trading_unlocked
    }

    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Sum of balances equals the minted supply
    pub fn is_conserved(&self) -> bool {
        self.balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            == Some(self.total_supply)
    }

    /// Allow holder transfers; only the distributor may unlock
    pub fn unlock_trading(&mut self, caller: &Pubkey) -> SaleResult<()> {
        if *caller != self.distributor {
            msg!("Error: Only the distributor can unlock trading");
            return Err(SaleError::Unauthorized);
        }
        if !self.trading_unlocked {
            self.trading_unlocked = true;
            msg!("Token trading unlocked");
        }
        Ok(())
    }

    /// Transfer from the caller's own balance
    pub fn transfer_as(&mut self, caller: &Pubkey, to: &Pubkey, amount: u128) -> SaleResult<()> {
        self.transfer(caller, to, amount)
    }

    pub fn approve(&mut self, caller: &Pubkey, spender: &Pubkey, amount: u128) -> SaleResult<()> {
        if amount == 0 {
            self.allowances.remove(&(*caller, *spender));
        } else {
            self.allowances.insert((*caller, *spender), amount);
        }
        Ok(())
    }

    /// Spend `caller`'s allowance on `from`
    pub fn transfer_from(
        &mut self,
        caller: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> SaleResult<()> {
        let allowed = self.allowance(from, caller);
        if amount > allowed {
            msg!("Error: Allowance exceeded");
            return Err(SaleError::InsufficientAllowance);
        }
        self.transfer(from, to, amount)?;
        self.approve(from, caller, allowed - amount)
    }

    fn check_transferable(&self, from: &Pubkey) -> SaleResult<()> {
        if !self.trading_unlocked && *from != self.distributor {
            msg!("Error: Token transfers are locked");
            return Err(SaleError::TransfersLocked);
        }
        Ok(())
    }
}

impl Transferable for TokenLedger {
    fn balance_of(&self, owner: &Pubkey) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> SaleResult<()> {
        self.check_transferable(from)?;

        let from_balance = self.balance_of(from);
        if amount > from_balance {
            msg!("Error: Insufficient token balance");
            return Err(SaleError::InsufficientBalance);
        }
        if amount == 0 || from == to {
            return Ok(());
        }

        // Cannot overflow while the supply is conserved
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(SaleError::ArithmeticOverflow)?;

        let remaining = from_balance - amount;
        if remaining == 0 {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }
        self.balances.insert(*to, to_balance);
        Ok(())
    }
}
