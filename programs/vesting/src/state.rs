//! Vesting schedule state

use dutchsale_common::{
    CheckedExt, Clock, Context, Pubkey, ReentrancyGuard, SaleError, SaleResult, Transferable,
    ONE_YEAR,
};
use dutchsale_token::TokenLedger;
use model_safety::{vested_amount, withdrawable, VestingCurve};
use pinocchio::msg;

/// One week
pub const DEFAULT_CLIFF: u64 = 60 * 60 * 24 * 7;

/// Four years (126_144_000 s)
pub const DEFAULT_PERIOD: u64 = 4 * ONE_YEAR;

/// Release parameters of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingConfig {
    /// Seconds after creation before anything is withdrawable
    pub cliff: u64,
    /// Seconds after creation when the full grant is vested
    pub period: u64,
    pub curve: VestingCurve,
}

impl Default for VestingConfig {
    fn default() -> Self {
        Self {
            cliff: DEFAULT_CLIFF,
            period: DEFAULT_PERIOD,
            curve: VestingCurve::Linear,
        }
    }
}

impl VestingConfig {
    fn validate(&self) -> SaleResult<()> {
        if self.period == 0 || self.cliff > self.period {
            msg!("Error: Vesting cliff must not exceed a non-zero period");
            return Err(SaleError::InvalidParameter);
        }
        if let VestingCurve::Stepped { step_secs: 0 } = self.curve {
            return Err(SaleError::InvalidParameter);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VestingSchedule {
    /// Address holding the granted tokens
    pub address: Pubkey,
    beneficiary: Pubkey,
    wallet: Pubkey,
    token: Pubkey,
    start_time: u64,
    config: VestingConfig,
    total_allocated: u128,
    withdrawn: u128,
    revoked: bool,
    lock: ReentrancyGuard,
}

impl VestingSchedule {
    /// Create a schedule over the tokens `address` already holds
    ///
    /// Vesting starts at `clock.timestamp`.
    pub fn new(
        address: Pubkey,
        token: &TokenLedger,
        beneficiary: Pubkey,
        wallet: Pubkey,
        clock: &Clock,
        config: VestingConfig,
    ) -> SaleResult<Self> {
        config.validate()?;
        Ok(Self {
            address,
            beneficiary,
            wallet,
            token: token.address,
            start_time: clock.timestamp,
            config,
            total_allocated: token.balance_of(&address),
            withdrawn: 0,
            revoked: false,
            lock: ReentrancyGuard::default(),
        })
    }

    pub fn beneficiary(&self) -> Pubkey {
        self.beneficiary
    }

    pub fn wallet(&self) -> Pubkey {
        self.wallet
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn config(&self) -> VestingConfig {
        self.config
    }

    pub fn total_allocated(&self) -> u128 {
        self.total_allocated
    }

    pub fn withdrawn(&self) -> u128 {
        self.withdrawn
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    fn elapsed(&self, clock: &Clock) -> u64 {
        clock.timestamp.saturating_sub(self.start_time)
    }

    fn before_cliff(&self, clock: &Clock) -> bool {
        self.elapsed(clock) < self.config.cliff
    }

    /// Amount the beneficiary could withdraw at `clock`
    pub fn calc_max_withdraw(&self, token: &TokenLedger, clock: &Clock) -> SaleResult<u128> {
        if self.revoked || self.before_cliff(clock) {
            return Ok(0);
        }
        let vested = vested_amount(
            self.total_allocated,
            self.elapsed(clock),
            self.config.cliff,
            self.config.period,
            self.config.curve,
        )
        .or_overflow()?;
        Ok(withdrawable(vested, self.withdrawn, token.balance_of(&self.address)))
    }

    /// Beneficiary withdraws `amount` vested tokens to `destination`
    pub fn withdraw(
        &mut self,
        ctx: &Context,
        token: &mut TokenLedger,
        destination: Pubkey,
        amount: u128,
    ) -> SaleResult<()> {
        self.lock.enter()?;
        let result = self.withdraw_inner(ctx, token, destination, amount);
        self.lock.exit();
        result
    }

    fn withdraw_inner(
        &mut self,
        ctx: &Context,
        token: &mut TokenLedger,
        destination: Pubkey,
        amount: u128,
    ) -> SaleResult<()> {
        if ctx.caller != self.beneficiary {
            msg!("Error: Only the beneficiary can withdraw");
            return Err(SaleError::Unauthorized);
        }
        self.require_token(token)?;
        if self.before_cliff(&ctx.clock) {
            msg!("Error: Vesting cliff not reached");
            return Err(SaleError::NotYetVested);
        }
        if amount > self.calc_max_withdraw(token, &ctx.clock)? {
            msg!("Error: Amount exceeds vested balance");
            return Err(SaleError::InsufficientVested);
        }
        self.release(token, destination, amount)?;
        msg!("Vested tokens withdrawn");
        Ok(())
    }

    /// Wallet takes everything currently withdrawable; returns the amount
    pub fn wallet_withdraw(&mut self, ctx: &Context, token: &mut TokenLedger) -> SaleResult<u128> {
        self.lock.enter()?;
        let result = self.wallet_withdraw_inner(ctx, token);
        self.lock.exit();
        result
    }

    fn wallet_withdraw_inner(&mut self, ctx: &Context, token: &mut TokenLedger) -> SaleResult<u128> {
        self.require_wallet(ctx)?;
        self.require_token(token)?;
        if self.before_cliff(&ctx.clock) {
            msg!("Error: Vesting cliff not reached");
            return Err(SaleError::NotYetVested);
        }
        let amount = self.calc_max_withdraw(token, &ctx.clock)?;
        self.release(token, self.wallet, amount)?;
        msg!("Vested tokens withdrawn to wallet");
        Ok(amount)
    }

    /// Wallet sweeps every held token, vested or not; returns the amount
    pub fn revoke(&mut self, ctx: &Context, token: &mut TokenLedger) -> SaleResult<u128> {
        self.lock.enter()?;
        let result = self.revoke_inner(ctx, token);
        self.lock.exit();
        result
    }

    fn revoke_inner(&mut self, ctx: &Context, token: &mut TokenLedger) -> SaleResult<u128> {
        self.require_wallet(ctx)?;
        self.require_token(token)?;
        let held = token.balance_of(&self.address);
        token.transfer(&self.address, &self.wallet, held)?;
        self.revoked = true;
        msg!("Vesting revoked");
        Ok(held)
    }

    fn release(&mut self, token: &mut TokenLedger, destination: Pubkey, amount: u128) -> SaleResult<()> {
        let withdrawn = self.withdrawn.checked_add(amount).or_overflow()?;
        token.transfer(&self.address, &destination, amount)?;
        self.withdrawn = withdrawn;
        Ok(())
    }

    fn require_wallet(&self, ctx: &Context) -> SaleResult<()> {
        if ctx.caller != self.wallet {
            msg!("Error: Caller is not the vesting wallet");
            return Err(SaleError::Unauthorized);
        }
        Ok(())
    }

    fn require_token(&self, token: &TokenLedger) -> SaleResult<()> {
        if token.address != self.token {
            return Err(SaleError::InvalidParameter);
        }
        Ok(())
    }
}
