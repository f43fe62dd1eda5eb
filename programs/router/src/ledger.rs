//! Execution ledger: deployment, clock and atomic calls

use crate::config::DeployConfig;
use crate::pda::{auction_address, multisig_address, token_address, vesting_address};
use crate::targets::Targets;
use dutchsale_auction::{DutchAuction, Stage};
use dutchsale_common::{
    Clock, Context, Dispatch, NativeBalances, Pubkey, SaleError, SaleResult, Transferable,
};
use dutchsale_multisig::{ExecutionOutcome, MultisigGate, TransactionId};
use dutchsale_token::{TokenInstruction, TokenLedger};
use dutchsale_vesting::{VestingInstruction, VestingSchedule};
use pinocchio::msg;
use std::collections::BTreeMap;

/// Addresses assigned at deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addresses {
    pub deployer: Pubkey,
    pub token: Pubkey,
    pub auction: Pubkey,
    pub multisig: Pubkey,
    /// Vesting schedules, in grant order
    pub vestings: Vec<Pubkey>,
}

/// Deployed sale plus the ledger it runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    addresses: Addresses,
    clock: Clock,
    native: NativeBalances,
    multisig: MultisigGate,
    targets: Targets,
}

impl Router {
    /// Deploy every program and set the auction up
    ///
    /// The multisig wallet is the auction wallet and the vesting wallet.
    pub fn deploy(config: &DeployConfig) -> SaleResult<Self> {
        let deployer = config.deployer;
        let token_addr = token_address(&deployer);
        let auction_addr = auction_address(&deployer);
        let wallet = multisig_address(&deployer);
        let vesting_addrs: Vec<Pubkey> = (0..config.vesting_grants.len() as u64)
            .map(|i| vesting_address(&deployer, i))
            .collect();

        let mut grants = Vec::with_capacity(config.vesting_grants.len() + 1);
        if config.wallet_grant > 0 {
            grants.push((wallet, config.wallet_grant));
        }
        grants.extend(vesting_addrs.iter().zip(&config.vesting_grants).map(|(a, g)| (*a, g.amount)));
        let token = TokenLedger::new(token_addr, auction_addr, &grants)?;

        let multisig = MultisigGate::new(wallet, &config.owners, config.required, config.daily_limit)?;

        let mut vestings = BTreeMap::new();
        for (address, grant) in vesting_addrs.iter().zip(&config.vesting_grants) {
            let schedule = VestingSchedule::new(
                *address,
                &token,
                grant.beneficiary,
                wallet,
                &config.genesis,
                config.vesting,
            )?;
            vestings.insert(*address, schedule);
        }

        let mut native = NativeBalances::new();
        let mut auction = DutchAuction::new(auction_addr, deployer, config.auction)?;
        let ctx = Context::new(deployer, config.genesis, &mut native);
        auction.setup(&ctx, &token, wallet)?;

        msg!("Sale deployed");
        Ok(Self {
            addresses: Addresses {
                deployer,
                token: token_addr,
                auction: auction_addr,
                multisig: wallet,
                vestings: vesting_addrs,
            },
            clock: config.genesis,
            native,
            multisig,
            targets: Targets { token, auction, vestings },
        })
    }

    // ------------------------------------------------------------------
    // Ledger
    // ------------------------------------------------------------------

    pub fn addresses(&self) -> &Addresses {
        &self.addresses
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn advance_blocks(&mut self, blocks: u64) {
        self.clock.block = self.clock.block.saturating_add(blocks);
    }

    pub fn advance_time(&mut self, secs: u64) {
        self.clock.timestamp = self.clock.timestamp.saturating_add(secs);
    }

    /// Move the clock to `timestamp`; time never runs backwards
    pub fn set_timestamp(&mut self, timestamp: u64) -> SaleResult<()> {
        if timestamp < self.clock.timestamp {
            return Err(SaleError::InvalidParameter);
        }
        self.clock.timestamp = timestamp;
        Ok(())
    }

    /// Credit native currency out of thin air (genesis funding)
    pub fn fund_native(&mut self, owner: Pubkey, amount: u128) {
        let balance = self.native.balance_of(&owner).saturating_add(amount);
        self.native.set_balance(owner, balance);
    }

    pub fn native_balance(&self, owner: &Pubkey) -> u128 {
        self.native.balance_of(owner)
    }

    pub fn token_balance(&self, owner: &Pubkey) -> u128 {
        self.targets.token.balance_of(owner)
    }

    pub fn token(&self) -> &TokenLedger {
        &self.targets.token
    }

    pub fn auction(&self) -> &DutchAuction {
        &self.targets.auction
    }

    pub fn multisig(&self) -> &MultisigGate {
        &self.multisig
    }

    pub fn vesting(&self, address: &Pubkey) -> SaleResult<&VestingSchedule> {
        self.targets.vestings.get(address).ok_or(SaleError::UnknownDestination)
    }

    /// Run `f` against the whole ledger; roll everything back if it fails
    fn atomic<T>(&mut self, f: impl FnOnce(&mut Self) -> SaleResult<T>) -> SaleResult<T> {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    // ------------------------------------------------------------------
    // Raw calls
    // ------------------------------------------------------------------

    /// Send `value` and instruction data from `caller` to `destination`
    pub fn call(&mut self, caller: Pubkey, destination: Pubkey, value: u128, payload: &[u8]) -> SaleResult<()> {
        self.atomic(|r| {
            let mut ctx = Context::new(caller, r.clock, &mut r.native);
            if destination == r.multisig.address {
                ctx.native.transfer(&caller, &destination, value)?;
                if payload.is_empty() {
                    return Ok(());
                }
                return dutchsale_multisig::entrypoint::process_instruction(&mut r.multisig, &mut ctx, payload);
            }
            r.targets.dispatch(&mut ctx, &destination, value, payload)
        })
    }

    // ------------------------------------------------------------------
    // Auction
    // ------------------------------------------------------------------

    pub fn calc_token_price(&self) -> SaleResult<u128> {
        self.targets.auction.calc_token_price(&self.clock)
    }

    pub fn calc_stop_price(&self) -> SaleResult<u128> {
        self.targets.auction.calc_stop_price()
    }

    /// Returns the accepted amount
    pub fn bid(&mut self, bidder: Pubkey, amount: u128) -> SaleResult<u128> {
        self.atomic(|r| {
            let mut ctx = Context::new(bidder, r.clock, &mut r.native);
            r.targets.auction.bid(&mut ctx, &mut r.targets.token, amount)
        })
    }

    pub fn claim_tokens(&mut self, caller: Pubkey, bidder: Pubkey) -> SaleResult<u128> {
        self.atomic(|r| {
            let mut ctx = Context::new(caller, r.clock, &mut r.native);
            r.targets.auction.claim_tokens(&mut ctx, &mut r.targets.token, bidder)
        })
    }

    pub fn update_stage(&mut self, caller: Pubkey) -> SaleResult<Stage> {
        self.atomic(|r| {
            let mut ctx = Context::new(caller, r.clock, &mut r.native);
            r.targets.auction.update_stage(&mut ctx, &mut r.targets.token)
        })
    }

    // ------------------------------------------------------------------
    // Token
    // ------------------------------------------------------------------

    pub fn transfer(&mut self, caller: Pubkey, to: Pubkey, amount: u128) -> SaleResult<()> {
        let token = self.addresses.token;
        self.call(caller, token, 0, &TokenInstruction::Transfer { to, amount }.pack())
    }

    pub fn approve(&mut self, caller: Pubkey, spender: Pubkey, amount: u128) -> SaleResult<()> {
        let token = self.addresses.token;
        self.call(caller, token, 0, &TokenInstruction::Approve { spender, amount }.pack())
    }

    pub fn transfer_from(&mut self, caller: Pubkey, from: Pubkey, to: Pubkey, amount: u128) -> SaleResult<()> {
        let token = self.addresses.token;
        self.call(caller, token, 0, &TokenInstruction::TransferFrom { from, to, amount }.pack())
    }

    // ------------------------------------------------------------------
    // Vesting
    // ------------------------------------------------------------------

    pub fn calc_max_withdraw(&self, vesting: &Pubkey) -> SaleResult<u128> {
        self.vesting(vesting)?.calc_max_withdraw(&self.targets.token, &self.clock)
    }

    pub fn withdraw(&mut self, caller: Pubkey, vesting: Pubkey, destination: Pubkey, amount: u128) -> SaleResult<()> {
        self.call(caller, vesting, 0, &VestingInstruction::Withdraw { destination, amount }.pack())
    }

    // ------------------------------------------------------------------
    // Multisig
    // ------------------------------------------------------------------

    pub fn submit_transaction(
        &mut self,
        owner: Pubkey,
        destination: Pubkey,
        value: u128,
        payload: Vec<u8>,
    ) -> SaleResult<(TransactionId, ExecutionOutcome)> {
        self.atomic(|r| {
            let mut ctx = Context::new(owner, r.clock, &mut r.native);
            r.multisig.submit_transaction(&mut ctx, &mut r.targets, destination, value, payload)
        })
    }

    pub fn confirm_transaction(&mut self, owner: Pubkey, id: TransactionId) -> SaleResult<ExecutionOutcome> {
        self.atomic(|r| {
            let mut ctx = Context::new(owner, r.clock, &mut r.native);
            r.multisig.confirm_transaction(&mut ctx, &mut r.targets, id)
        })
    }

    pub fn revoke_confirmation(&mut self, owner: Pubkey, id: TransactionId) -> SaleResult<()> {
        self.atomic(|r| {
            let ctx = Context::new(owner, r.clock, &mut r.native);
            r.multisig.revoke_confirmation(&ctx, id)
        })
    }

    pub fn execute_transaction(&mut self, owner: Pubkey, id: TransactionId) -> SaleResult<ExecutionOutcome> {
        self.atomic(|r| {
            let mut ctx = Context::new(owner, r.clock, &mut r.native);
            r.multisig.execute_transaction(&mut ctx, &mut r.targets, id)
        })
    }

    /// Submit and have the remaining owners confirm, in owner order
    ///
    /// Convenience for wallet-driven calls; stops at the first outcome that is
    /// not `Pending`.
    pub fn wallet_call(&mut self, destination: Pubkey, value: u128, payload: Vec<u8>) -> SaleResult<ExecutionOutcome> {
        let owners = self.multisig.owners().to_vec();
        let (first, rest) = owners.split_first().ok_or(SaleError::NotOwner)?;
        let (id, mut outcome) = self.submit_transaction(*first, destination, value, payload)?;
        for owner in rest {
            if outcome != ExecutionOutcome::Pending {
                break;
            }
            outcome = self.confirm_transaction(*owner, id)?;
        }
        Ok(outcome)
    }
}
