//! Auction state machine

use dutchsale_common::{
    CheckedExt, Clock, Context, Pubkey, ReentrancyGuard, SaleError, SaleResult, Transferable,
    MAX_TOKENS_SOLD, WAITING_PERIOD,
};
use dutchsale_token::TokenLedger;
use model_safety::{max_acceptable_bid, stop_price, stop_reached, token_price, tokens_for};
use pinocchio::msg;
use std::collections::BTreeMap;

/// Auction lifecycle; only ever moves forward
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Deployed = 0,
    Setup = 1,
    AuctionStarted = 2,
    AuctionEnded = 3,
    TradingStarted = 4,
}

/// Price curve settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionParams {
    /// Funding goal; reaching it ends the auction
    pub ceiling: u128,
    /// Steepness of the initial price
    pub price_factor: u128,
}

impl AuctionParams {
    fn validate(&self) -> SaleResult<()> {
        if self.ceiling == 0 || self.price_factor == 0 {
            msg!("Error: Ceiling and price factor must be non-zero");
            return Err(SaleError::InvalidParameter);
        }
        Ok(())
    }
}

/// Accepted bid, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bid {
    pub bidder: Pubkey,
    pub amount: u128,
    pub sequence: u64,
}

/// Per-bidder aggregate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contribution {
    pub amount: u128,
    pub claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutchAuction {
    /// Address of this auction; holds the tokens for sale and the bids
    pub address: Pubkey,
    owner: Pubkey,
    token: Pubkey,
    wallet: Pubkey,
    stage: Stage,
    params: AuctionParams,
    start_block: u64,
    end_time: u64,
    total_received: u128,
    final_price: u128,
    bids: Vec<Bid>,
    contributions: BTreeMap<Pubkey, Contribution>,
    lock: ReentrancyGuard,
}

impl DutchAuction {
    pub fn new(address: Pubkey, owner: Pubkey, params: AuctionParams) -> SaleResult<Self> {
        params.validate()?;
        Ok(Self {
            address,
            owner,
            token: Pubkey::default(),
            wallet: Pubkey::default(),
            stage: Stage::Deployed,
            params,
            start_block: 0,
            end_time: 0,
            total_received: 0,
            final_price: 0,
            bids: Vec::new(),
            contributions: BTreeMap::new(),
            lock: ReentrancyGuard::default(),
        })
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn owner(&self) -> Pubkey {
        self.owner
    }

    pub fn wallet(&self) -> Pubkey {
        self.wallet
    }

    pub fn token(&self) -> Pubkey {
        self.token
    }

    pub fn ceiling(&self) -> u128 {
        self.params.ceiling
    }

    pub fn price_factor(&self) -> u128 {
        self.params.price_factor
    }

    pub fn start_block(&self) -> u64 {
        self.start_block
    }

    pub fn end_time(&self) -> u64 {
        self.end_time
    }

    pub fn total_received(&self) -> u128 {
        self.total_received
    }

    /// Zero until the auction ends
    pub fn final_price(&self) -> u128 {
        self.final_price
    }

    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    pub fn contribution(&self, bidder: &Pubkey) -> Contribution {
        self.contributions.get(bidder).copied().unwrap_or_default()
    }

    /// Current token price; the start price until bidding opens
    pub fn calc_token_price(&self, clock: &Clock) -> SaleResult<u128> {
        token_price(self.params.price_factor, self.elapsed_blocks(clock)).or_overflow()
    }

    pub fn calc_stop_price(&self) -> SaleResult<u128> {
        stop_price(self.total_received).or_overflow()
    }

    /// Stage after applying the time-driven transitions at `clock`
    pub fn stage_at(&self, clock: &Clock) -> SaleResult<Stage> {
        match self.stage {
            // Finalizing stamps end_time with this clock, so the waiting
            // period cannot also elapse within the same call
            Stage::AuctionStarted if self.stop_reached(clock)? => Ok(Stage::AuctionEnded),
            Stage::AuctionEnded if self.waiting_period_over(clock) => Ok(Stage::TradingStarted),
            stage => Ok(stage),
        }
    }

    fn elapsed_blocks(&self, clock: &Clock) -> u64 {
        if self.stage >= Stage::AuctionStarted {
            clock.block.saturating_sub(self.start_block)
        } else {
            0
        }
    }

    fn stop_reached(&self, clock: &Clock) -> SaleResult<bool> {
        stop_reached(self.params.price_factor, self.elapsed_blocks(clock), self.total_received).or_overflow()
    }

    fn waiting_period_over(&self, clock: &Clock) -> bool {
        clock.timestamp > self.end_time.saturating_add(WAITING_PERIOD)
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Bind the token and the controlling wallet (owner only)
    pub fn setup(&mut self, ctx: &Context, token: &TokenLedger, wallet: Pubkey) -> SaleResult<()> {
        self.lock.enter()?;
        let result = self.setup_inner(ctx, token, wallet);
        self.lock.exit();
        result
    }

    fn setup_inner(&mut self, ctx: &Context, token: &TokenLedger, wallet: Pubkey) -> SaleResult<()> {
        if ctx.caller != self.owner {
            msg!("Error: Only the owner can set up the auction");
            return Err(SaleError::Unauthorized);
        }
        self.require_stage(Stage::Deployed)?;
        if wallet == Pubkey::default() {
            return Err(SaleError::InvalidParameter);
        }
        if token.distributor() != self.address || token.balance_of(&self.address) != MAX_TOKENS_SOLD {
            msg!("Error: Auction does not hold the tokens for sale");
            return Err(SaleError::SupplyMismatch);
        }

        self.token = token.address;
        self.wallet = wallet;
        self.stage = Stage::Setup;
        msg!("Auction set up");
        Ok(())
    }

    /// Change ceiling and price factor (wallet only, before bidding opens)
    pub fn change_settings(&mut self, ctx: &Context, ceiling: u128, price_factor: u128) -> SaleResult<()> {
        self.lock.enter()?;
        let result = self.change_settings_inner(ctx, AuctionParams { ceiling, price_factor });
        self.lock.exit();
        result
    }

    /// Alias kept for callers that only think in terms of the funding goal
    pub fn change_ceiling(&mut self, ctx: &Context, ceiling: u128, price_factor: u128) -> SaleResult<()> {
        self.change_settings(ctx, ceiling, price_factor)
    }

    fn change_settings_inner(&mut self, ctx: &Context, params: AuctionParams) -> SaleResult<()> {
        self.require_wallet(ctx)?;
        self.require_stage(Stage::Setup)?;
        params.validate()?;
        self.params = params;
        msg!("Auction settings changed");
        Ok(())
    }

    /// Open bidding at the current block (wallet only)
    pub fn start_auction(&mut self, ctx: &Context) -> SaleResult<()> {
        self.lock.enter()?;
        let result = self.start_inner(ctx);
        self.lock.exit();
        result
    }

    fn start_inner(&mut self, ctx: &Context) -> SaleResult<()> {
        self.require_wallet(ctx)?;
        self.require_stage(Stage::Setup)?;
        self.start_block = ctx.clock.block;
        self.stage = Stage::AuctionStarted;
        msg!("Auction started");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Bidding
    // ------------------------------------------------------------------

    /// Contribute up to `amount` of sale currency; returns the accepted amount
    ///
    /// Anything above what the current price or the ceiling can absorb is
    /// refused and stays with the bidder. The bid that exhausts either limit,
    /// or pushes the stop price to the token price, ends the auction.
    pub fn bid(&mut self, ctx: &mut Context, token: &mut TokenLedger, amount: u128) -> SaleResult<u128> {
        self.lock.enter()?;
        let result = self.bid_inner(ctx, token, amount);
        self.lock.exit();
        result
    }

    fn bid_inner(&mut self, ctx: &mut Context, token: &mut TokenLedger, amount: u128) -> SaleResult<u128> {
        self.require_stage(Stage::AuctionStarted)?;
        self.require_token(token)?;
        if amount == 0 {
            msg!("Error: Bid amount must be positive");
            return Err(SaleError::InvalidParameter);
        }

        let price = self.calc_token_price(&ctx.clock)?;
        if self.calc_stop_price()? >= price {
            // Price decay already ended the auction; the stage catches up on
            // the next update
            msg!("Error: Auction already concluded");
            return Err(SaleError::InvalidStage);
        }

        let max_bid = max_acceptable_bid(price, self.total_received, self.params.ceiling).or_overflow()?;
        let accepted = amount.min(max_bid);
        if accepted == 0 {
            return Err(SaleError::InvalidStage);
        }

        let total = self.total_received.checked_add(accepted).or_overflow()?;
        let contribution = self.contribution(&ctx.caller);
        let contributed = contribution.amount.checked_add(accepted).or_overflow()?;
        let concluded = accepted == max_bid || stop_price(total).or_overflow()? >= price;

        ctx.native.transfer(&ctx.caller, &self.address, accepted)?;

        let sequence = self.bids.len() as u64;
        self.bids.push(Bid { bidder: ctx.caller, amount: accepted, sequence });
        self.contributions.insert(
            ctx.caller,
            Contribution { amount: contributed, claimed: false },
        );
        self.total_received = total;
        msg!("Bid accepted");

        if concluded {
            self.finalize(ctx, token, price)?;
        }
        Ok(accepted)
    }

    /// Move to AuctionEnded at `final_price`: unsold tokens and all proceeds
    /// go to the wallet
    fn finalize(&mut self, ctx: &mut Context, token: &mut TokenLedger, final_price: u128) -> SaleResult<()> {
        let sold = tokens_for(self.total_received, final_price).or_overflow()?;
        let unsold = MAX_TOKENS_SOLD.checked_sub(sold).or_overflow()?;
        token.transfer(&self.address, &self.wallet, unsold)?;

        let proceeds = ctx.native.balance_of(&self.address);
        ctx.native.transfer(&self.address, &self.wallet, proceeds)?;

        self.final_price = final_price;
        self.end_time = ctx.clock.timestamp;
        self.stage = Stage::AuctionEnded;
        msg!("Auction ended");
        Ok(())
    }

    /// Commit the transitions `stage_at` predicts
    fn apply_timed_transitions(&mut self, ctx: &mut Context, token: &mut TokenLedger) -> SaleResult<()> {
        if self.stage == Stage::AuctionStarted && self.stop_reached(&ctx.clock)? {
            // Price decay, not a bid, crossed the curve: clearing at the stop
            // price keeps the tokens sold within supply
            let price = self.calc_stop_price()?;
            self.finalize(ctx, token, price)?;
        }
        if self.stage == Stage::AuctionEnded && self.waiting_period_over(&ctx.clock) {
            token.unlock_trading(&self.address)?;
            self.stage = Stage::TradingStarted;
            msg!("Trading started");
        }
        Ok(())
    }

    /// Apply time-driven transitions and return the resulting stage
    pub fn update_stage(&mut self, ctx: &mut Context, token: &mut TokenLedger) -> SaleResult<Stage> {
        self.lock.enter()?;
        let result = self
            .require_token(token)
            .and_then(|_| self.apply_timed_transitions(ctx, token))
            .map(|_| self.stage);
        self.lock.exit();
        result
    }

    // ------------------------------------------------------------------
    // Claims
    // ------------------------------------------------------------------

    /// Pay `bidder` their tokens at the final price; 0 once already claimed
    pub fn claim_tokens(&mut self, ctx: &mut Context, token: &mut TokenLedger, bidder: Pubkey) -> SaleResult<u128> {
        self.lock.enter()?;
        let result = self.claim_inner(ctx, token, bidder);
        self.lock.exit();
        result
    }

    fn claim_inner(&mut self, ctx: &mut Context, token: &mut TokenLedger, bidder: Pubkey) -> SaleResult<u128> {
        self.require_token(token)?;
        if self.stage_at(&ctx.clock)? < Stage::AuctionEnded {
            msg!("Error: Auction has not ended");
            return Err(SaleError::InvalidStage);
        }
        self.apply_timed_transitions(ctx, token)?;

        let contribution = self.contribution(&bidder);
        if contribution.claimed || contribution.amount == 0 {
            return Ok(0);
        }

        let owed = tokens_for(contribution.amount, self.final_price).or_overflow()?;
        token.transfer(&self.address, &bidder, owed)?;
        self.contributions.insert(bidder, Contribution { claimed: true, ..contribution });
        msg!("Tokens claimed");
        Ok(owed)
    }

    // ------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------

    fn require_stage(&self, stage: Stage) -> SaleResult<()> {
        if self.stage != stage {
            msg!("Error: Invalid auction stage");
            return Err(SaleError::InvalidStage);
        }
        Ok(())
    }

    fn require_wallet(&self, ctx: &Context) -> SaleResult<()> {
        if self.wallet == Pubkey::default() || ctx.caller != self.wallet {
            msg!("Error: Caller is not the auction wallet");
            return Err(SaleError::Unauthorized);
        }
        Ok(())
    }

    fn require_token(&self, token: &TokenLedger) -> SaleResult<()> {
        if token.address != self.token {
            msg!("Error: Token does not match the auction");
            return Err(SaleError::InvalidParameter);
        }
        Ok(())
    }
}
