//! Multisig wallet state and transaction queue

use crate::instruction::MultisigInstruction;
use arrayvec::ArrayVec;
use dutchsale_common::{
    Context, Dispatch, Pubkey, ReentrancyGuard, SaleError, SaleResult, ONE_DAY,
};
use pinocchio::msg;

/// Maximum number of owners
pub const MAX_OWNER_COUNT: usize = 50;

/// Transaction id (index into the queue)
pub type TransactionId = u64;

/// Queued call awaiting confirmations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigTransaction {
    pub destination: Pubkey,
    pub value: u128,
    pub payload: Vec<u8>,
    /// Distinct confirming owners, in confirmation order
    confirmations: ArrayVec<Pubkey, MAX_OWNER_COUNT>,
    /// Set once, on the first successful execution
    pub executed: bool,
}

impl MultisigTransaction {
    pub fn confirmations(&self) -> &[Pubkey] {
        &self.confirmations
    }

    pub fn is_confirmed_by(&self, owner: &Pubkey) -> bool {
        self.confirmations.contains(owner)
    }
}

/// Result of an execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Threshold not reached yet
    Pending,
    /// Forwarded call succeeded; the transaction is now executed
    Executed,
    /// Forwarded call failed and was rolled back; the transaction stays
    /// unexecuted and can be retried
    Failed(SaleError),
}

/// M-of-N authorization gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigGate {
    /// Wallet address; forwarded calls carry it as their caller
    pub address: Pubkey,
    owners: ArrayVec<Pubkey, MAX_OWNER_COUNT>,
    required: usize,
    /// Value that may leave the wallet per day without full confirmation
    daily_limit: u128,
    last_day: u64,
    spent_today: u128,
    transactions: Vec<MultisigTransaction>,
    lock: ReentrancyGuard,
}

fn validate_requirement(owner_count: usize, required: usize) -> SaleResult<()> {
    if owner_count > MAX_OWNER_COUNT || required == 0 || required > owner_count {
        return Err(SaleError::InvalidRequirement);
    }
    Ok(())
}

impl MultisigGate {
    pub fn new(
        address: Pubkey,
        owners: &[Pubkey],
        required: usize,
        daily_limit: u128,
    ) -> SaleResult<Self> {
        validate_requirement(owners.len(), required)?;

        let mut set: ArrayVec<Pubkey, MAX_OWNER_COUNT> = ArrayVec::new();
        for owner in owners {
            if *owner == Pubkey::default() {
                return Err(SaleError::InvalidParameter);
            }
            if set.contains(owner) {
                return Err(SaleError::OwnerExists);
            }
            set.try_push(*owner).map_err(|_| SaleError::OwnerLimit)?;
        }

        Ok(Self {
            address,
            owners: set,
            required,
            daily_limit,
            last_day: 0,
            spent_today: 0,
            transactions: Vec::new(),
            lock: ReentrancyGuard::default(),
        })
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn owners(&self) -> &[Pubkey] {
        &self.owners
    }

    pub fn is_owner(&self, who: &Pubkey) -> bool {
        self.owners.contains(who)
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn daily_limit(&self) -> u128 {
        self.daily_limit
    }

    pub fn spent_today(&self) -> u128 {
        self.spent_today
    }

    pub fn transaction(&self, id: TransactionId) -> SaleResult<&MultisigTransaction> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.transactions.get(i))
            .ok_or(SaleError::TransactionNotFound)
    }

    /// Confirmations from current owners only
    pub fn confirmation_count(&self, id: TransactionId) -> SaleResult<usize> {
        let tx = self.transaction(id)?;
        Ok(tx.confirmations.iter().filter(|c| self.is_owner(c)).count())
    }

    pub fn is_confirmed(&self, id: TransactionId) -> SaleResult<bool> {
        Ok(self.confirmation_count(id)? >= self.required)
    }

    /// Count transactions filtered by execution status
    pub fn transaction_count(&self, pending: bool, executed: bool) -> usize {
        self.transactions
            .iter()
            .filter(|tx| (pending && !tx.executed) || (executed && tx.executed))
            .count()
    }

    // ------------------------------------------------------------------
    // Owner operations
    // ------------------------------------------------------------------

    /// Queue a call and confirm it as the submitter
    pub fn submit_transaction(
        &mut self,
        ctx: &mut Context,
        dispatcher: &mut impl Dispatch,
        destination: Pubkey,
        value: u128,
        payload: Vec<u8>,
    ) -> SaleResult<(TransactionId, ExecutionOutcome)> {
        self.lock.enter()?;
        let result = self.submit_inner(ctx, dispatcher, destination, value, payload);
        self.lock.exit();
        result
    }

    fn submit_inner(
        &mut self,
        ctx: &mut Context,
        dispatcher: &mut impl Dispatch,
        destination: Pubkey,
        value: u128,
        payload: Vec<u8>,
    ) -> SaleResult<(TransactionId, ExecutionOutcome)> {
        self.require_owner(&ctx.caller)?;

        let id = self.transactions.len() as TransactionId;
        let mut confirmations = ArrayVec::new();
        confirmations.push(ctx.caller);
        self.transactions.push(MultisigTransaction {
            destination,
            value,
            payload,
            confirmations,
            executed: false,
        });
        msg!("Transaction submitted");

        let outcome = self.try_execute(ctx, dispatcher, id)?;
        Ok((id, outcome))
    }

    /// Add the caller's confirmation; executes once the threshold is reached
    pub fn confirm_transaction(
        &mut self,
        ctx: &mut Context,
        dispatcher: &mut impl Dispatch,
        id: TransactionId,
    ) -> SaleResult<ExecutionOutcome> {
        self.lock.enter()?;
        let result = self.confirm_inner(ctx, dispatcher, id);
        self.lock.exit();
        result
    }

    fn confirm_inner(
        &mut self,
        ctx: &mut Context,
        dispatcher: &mut impl Dispatch,
        id: TransactionId,
    ) -> SaleResult<ExecutionOutcome> {
        self.require_owner(&ctx.caller)?;
        let tx = self.transaction(id)?;
        if tx.executed {
            msg!("Error: Transaction already executed");
            return Err(SaleError::AlreadyExecuted);
        }
        if tx.is_confirmed_by(&ctx.caller) {
            msg!("Error: Transaction already confirmed by caller");
            return Err(SaleError::AlreadyConfirmed);
        }

        let caller = ctx.caller;
        self.transaction_mut(id)?
            .confirmations
            .try_push(caller)
            .map_err(|_| SaleError::OwnerLimit)?;
        msg!("Transaction confirmed");

        self.try_execute(ctx, dispatcher, id)
    }

    /// Withdraw the caller's confirmation from a pending transaction
    pub fn revoke_confirmation(&mut self, ctx: &Context, id: TransactionId) -> SaleResult<()> {
        self.lock.enter()?;
        let result = self.revoke_inner(ctx, id);
        self.lock.exit();
        result
    }

    fn revoke_inner(&mut self, ctx: &Context, id: TransactionId) -> SaleResult<()> {
        self.require_owner(&ctx.caller)?;
        let tx = self.transaction(id)?;
        if tx.executed {
            return Err(SaleError::AlreadyExecuted);
        }
        if !tx.is_confirmed_by(&ctx.caller) {
            return Err(SaleError::NotConfirmed);
        }

        let caller = ctx.caller;
        self.transaction_mut(id)?.confirmations.retain(|c| *c != caller);
        msg!("Confirmation revoked");
        Ok(())
    }

    /// Retry a transaction whose forwarded call failed earlier
    pub fn execute_transaction(
        &mut self,
        ctx: &mut Context,
        dispatcher: &mut impl Dispatch,
        id: TransactionId,
    ) -> SaleResult<ExecutionOutcome> {
        self.lock.enter()?;
        let result = self.execute_inner(ctx, dispatcher, id);
        self.lock.exit();
        result
    }

    fn execute_inner(
        &mut self,
        ctx: &mut Context,
        dispatcher: &mut impl Dispatch,
        id: TransactionId,
    ) -> SaleResult<ExecutionOutcome> {
        self.require_owner(&ctx.caller)?;
        if self.transaction(id)?.executed {
            return Err(SaleError::AlreadyExecuted);
        }
        self.try_execute(ctx, dispatcher, id)
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    fn try_execute(
        &mut self,
        ctx: &mut Context,
        dispatcher: &mut impl Dispatch,
        id: TransactionId,
    ) -> SaleResult<ExecutionOutcome> {
        let confirmed = self.is_confirmed(id)?;
        let tx = self.transaction(id)?;
        let (destination, value, payload) = (tx.destination, tx.value, tx.payload.clone());

        let limit_path = !confirmed && payload.is_empty() && self.is_under_limit(ctx.clock.timestamp, value);
        if !confirmed && !limit_path {
            return Ok(ExecutionOutcome::Pending);
        }

        let result = if destination == self.address {
            // Value sent to itself stays put; only the payload matters
            let wallet = self.address;
            self.process_admin(&wallet, &payload)
        } else {
            let mut inner = ctx.as_caller(self.address);
            dispatcher.dispatch(&mut inner, &destination, value, &payload)
        };

        match result {
            Ok(()) => {
                self.transaction_mut(id)?.executed = true;
                if limit_path {
                    self.spent_today = self.spent_today.saturating_add(value);
                }
                msg!("Transaction executed");
                Ok(ExecutionOutcome::Executed)
            }
            Err(e) => {
                msg!("Error: Transaction execution failed");
                Ok(ExecutionOutcome::Failed(e))
            }
        }
    }

    /// Daily-limit check; rolls the spending window over after 24h
    fn is_under_limit(&mut self, now: u64, amount: u128) -> bool {
        if now > self.last_day.saturating_add(ONE_DAY) {
            self.last_day = now;
            self.spent_today = 0;
        }
        match self.spent_today.checked_add(amount) {
            Some(total) => total <= self.daily_limit,
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Administration (self-calls)
    // ------------------------------------------------------------------

    /// Apply a wallet administration instruction; `caller` must be the wallet itself
    pub fn process_admin(&mut self, caller: &Pubkey, data: &[u8]) -> SaleResult<()> {
        if *caller != self.address {
            msg!("Error: Wallet administration requires a confirmed self-call");
            return Err(SaleError::Unauthorized);
        }

        match MultisigInstruction::unpack(data)? {
            MultisigInstruction::AddOwner { owner } => {
                if owner == Pubkey::default() {
                    return Err(SaleError::InvalidParameter);
                }
                if self.is_owner(&owner) {
                    return Err(SaleError::OwnerExists);
                }
                validate_requirement(self.owners.len() + 1, self.required)?;
                self.owners.try_push(owner).map_err(|_| SaleError::OwnerLimit)?;
                msg!("Owner added");
            }
            MultisigInstruction::RemoveOwner { owner } => {
                if !self.is_owner(&owner) {
                    return Err(SaleError::NotOwner);
                }
                if self.owners.len() == 1 {
                    return Err(SaleError::InvalidRequirement);
                }
                self.owners.retain(|o| *o != owner);
                if self.required > self.owners.len() {
                    self.required = self.owners.len();
                }
                msg!("Owner removed");
            }
            MultisigInstruction::ReplaceOwner { owner, new_owner } => {
                if !self.is_owner(&owner) {
                    return Err(SaleError::NotOwner);
                }
                if new_owner == Pubkey::default() {
                    return Err(SaleError::InvalidParameter);
                }
                if self.is_owner(&new_owner) {
                    return Err(SaleError::OwnerExists);
                }
                if let Some(slot) = self.owners.iter_mut().find(|o| **o == owner) {
                    *slot = new_owner;
                }
                msg!("Owner replaced");
            }
            MultisigInstruction::ChangeRequirement { required } => {
                let required = usize::try_from(required).map_err(|_| SaleError::InvalidRequirement)?;
                validate_requirement(self.owners.len(), required)?;
                self.required = required;
                msg!("Requirement changed");
            }
            MultisigInstruction::ChangeDailyLimit { daily_limit } => {
                self.daily_limit = daily_limit;
                msg!("Daily limit changed");
            }
        }
        Ok(())
    }

    fn require_owner(&self, who: &Pubkey) -> SaleResult<()> {
        if !self.is_owner(who) {
            msg!("Error: Caller is not a wallet owner");
            return Err(SaleError::Unauthorized);
        }
        Ok(())
    }

    fn transaction_mut(&mut self, id: TransactionId) -> SaleResult<&mut MultisigTransaction> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.transactions.get_mut(i))
            .ok_or(SaleError::TransactionNotFound)
    }
}
