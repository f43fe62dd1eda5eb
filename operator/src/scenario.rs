//! Scenario replay
//!
//! A scenario is a JSON list of steps run in order against a freshly deployed
//! sale. Amounts are base units (1e18 per token). A rejected call is logged
//! and the replay continues.

use crate::config::{format_address, parse_address};
use anyhow::{Context, Result};
use dutchsale_auction::AuctionInstruction;
use dutchsale_common::{Pubkey, SaleError, UNIT};
use dutchsale_multisig::ExecutionOutcome;
use dutchsale_router::Router;
use dutchsale_vesting::VestingInstruction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Env var naming the scenario file
pub const SCENARIO_ENV: &str = "DUTCHSALE_SCENARIO";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepError {
    #[error("call rejected: {0}")]
    Rejected(#[from] SaleError),

    #[error("vesting schedule #{0} is not deployed")]
    UnknownVesting(usize),

    #[error("wallet call did not execute: {0:?}")]
    NotExecuted(ExecutionOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Fund { account: String, amount: u128 },
    AdvanceBlocks { blocks: u64 },
    AdvanceTime { secs: u64 },
    /// Wallet changes ceiling and price factor through the multisig
    ChangeSettings { ceiling: u128, price_factor: u128 },
    /// Wallet opens bidding through the multisig
    StartAuction,
    Bid { bidder: String, amount: u128 },
    UpdateStage,
    Claim { bidder: String },
    Transfer { from: String, to: String, amount: u128 },
    Withdraw { vesting: usize, beneficiary: String, amount: u128 },
    /// Wallet takes what has vested, through the multisig
    WalletWithdraw { vesting: usize },
    /// Wallet sweeps a schedule, through the multisig
    Revoke { vesting: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn load(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path).context(format!("Failed to read scenario file: {}", path))?;
        serde_json::from_str(&text).context("Failed to parse scenario JSON")
    }

    /// Two bids, the second one crossing the stop price, then both claims
    pub fn stop_price_flow() -> Self {
        let alice = format_address(&[0x01; 32]);
        let bob = format_address(&[0x02; 32]);
        Self {
            steps: vec![
                Step::Fund { account: alice.clone(), amount: 1_000_000 * UNIT },
                Step::Fund { account: bob.clone(), amount: 1_000_000 * UNIT },
                Step::StartAuction,
                Step::Bid { bidder: alice.clone(), amount: 100_000 * UNIT },
                Step::AdvanceBlocks { blocks: 5760 * 60 },
                Step::Bid { bidder: bob.clone(), amount: 150_000 * UNIT },
                Step::Bid { bidder: bob.clone(), amount: 1 },
                Step::Claim { bidder: alice },
                Step::Claim { bidder: bob },
            ],
        }
    }
}

/// Replays steps against a deployed sale
pub struct Runner {
    pub router: Router,
    accepted: usize,
    rejected: usize,
}

impl Runner {
    pub fn new(router: Router) -> Self {
        Self { router, accepted: 0, rejected: 0 }
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Run every step, logging each result
    pub fn run(&mut self, scenario: &Scenario) -> Result<()> {
        for (i, step) in scenario.steps.iter().enumerate() {
            match self.step(step)? {
                Ok(detail) => {
                    self.accepted += 1;
                    log::info!("step {}: {:?} -> {}", i, step, detail);
                }
                Err(e) => {
                    self.rejected += 1;
                    log::warn!("step {}: {:?} rejected: {}", i, step, e);
                }
            }
        }
        Ok(())
    }

    /// Outer error: malformed step. Inner error: the ledger refused the call.
    pub fn step(&mut self, step: &Step) -> Result<std::result::Result<String, StepError>> {
        let r = &mut self.router;
        let outcome = match step {
            Step::Fund { account, amount } => {
                r.fund_native(parse_address(account)?, *amount);
                Ok(format!("funded {}", amount))
            }
            Step::AdvanceBlocks { blocks } => {
                r.advance_blocks(*blocks);
                Ok(format!("block {}", r.clock().block))
            }
            Step::AdvanceTime { secs } => {
                r.advance_time(*secs);
                Ok(format!("timestamp {}", r.clock().timestamp))
            }
            Step::ChangeSettings { ceiling, price_factor } => {
                let auction = r.addresses().auction;
                let payload = AuctionInstruction::ChangeSettings { ceiling: *ceiling, price_factor: *price_factor }.pack();
                wallet_call(r, auction, payload).map(|_| "settings changed".to_string())
            }
            Step::StartAuction => {
                let auction = r.addresses().auction;
                wallet_call(r, auction, AuctionInstruction::StartAuction.pack())
                    .map(|_| format!("started at block {}", r.auction().start_block()))
            }
            Step::Bid { bidder, amount } => r
                .bid(parse_address(bidder)?, *amount)
                .map(|accepted| format!("accepted {} (stage {:?})", accepted, r.auction().stage()))
                .map_err(StepError::from),
            Step::UpdateStage => {
                let caller = r.addresses().deployer;
                r.update_stage(caller).map(|s| format!("stage {:?}", s)).map_err(StepError::from)
            }
            Step::Claim { bidder } => {
                let bidder = parse_address(bidder)?;
                r.claim_tokens(bidder, bidder).map(|t| format!("claimed {}", t)).map_err(StepError::from)
            }
            Step::Transfer { from, to, amount } => r
                .transfer(parse_address(from)?, parse_address(to)?, *amount)
                .map(|_| "transferred".to_string())
                .map_err(StepError::from),
            Step::Withdraw { vesting, beneficiary, amount } => {
                let beneficiary = parse_address(beneficiary)?;
                match vesting_address(r, *vesting) {
                    Ok(schedule) => r
                        .withdraw(beneficiary, schedule, beneficiary, *amount)
                        .map(|_| "withdrawn".to_string())
                        .map_err(StepError::from),
                    Err(e) => Err(e),
                }
            }
            Step::WalletWithdraw { vesting } => vesting_address(r, *vesting).and_then(|schedule| {
                wallet_call(r, schedule, VestingInstruction::WalletWithdraw.pack()).map(|_| "wallet withdrew".to_string())
            }),
            Step::Revoke { vesting } => vesting_address(r, *vesting).and_then(|schedule| {
                wallet_call(r, schedule, VestingInstruction::Revoke.pack()).map(|_| "revoked".to_string())
            }),
        };
        Ok(outcome)
    }
}

fn vesting_address(router: &Router, index: usize) -> std::result::Result<Pubkey, StepError> {
    router
        .addresses()
        .vestings
        .get(index)
        .copied()
        .ok_or(StepError::UnknownVesting(index))
}

fn wallet_call(router: &mut Router, destination: Pubkey, payload: Vec<u8>) -> std::result::Result<(), StepError> {
    match router.wallet_call(destination, 0, payload)? {
        ExecutionOutcome::Executed => Ok(()),
        other => Err(StepError::NotExecuted(other)),
    }
}
