//! Dutchsale Integration Tests
//!
//! End-to-end scenarios driving the deployed programs through the router.
//! Shared accounts and deployment helpers live here; the scenarios are in
//! `tests/`.

pub use dutchsale_auction::{AuctionInstruction, Stage};
pub use dutchsale_common::{
    Clock, Pubkey, SaleError, MAX_TOKENS_SOLD, ONE_YEAR, TOTAL_TOKENS, UNIT, WAITING_PERIOD,
};
pub use dutchsale_multisig::{ExecutionOutcome, MultisigInstruction};
pub use dutchsale_router::{DeployConfig, Router, VestingGrant};
pub use dutchsale_vesting::VestingInstruction;
pub use model_safety::tokens_for;

pub const DEPLOYER: Pubkey = [0xD0; 32];
pub const OWNER_A: Pubkey = [0x0A; 32];
pub const OWNER_B: Pubkey = [0x0B; 32];
pub const OWNER_C: Pubkey = [0x0C; 32];
pub const ALICE: Pubkey = [0x01; 32];
pub const BOB: Pubkey = [0x02; 32];
pub const CAROL: Pubkey = [0x03; 32];

/// Deployment timestamp
pub const T0: u64 = 1_500_000_000;

/// Blocks per day at 15 s blocks
pub const BLOCKS_PER_DAY: u64 = 5760;

fn genesis() -> Clock {
    Clock { block: 1_000, timestamp: T0 }
}

/// Two-of-two wallet holding every reserved token
pub fn deploy_single_wallet() -> Router {
    let mut config = DeployConfig::new(DEPLOYER, vec![OWNER_A, OWNER_B], 2);
    config.genesis = genesis();
    Router::deploy(&config).expect("deploy")
}

/// Two-of-two wallet; the reserved tokens vest for ALICE and BOB, half each
pub fn deploy_with_vesting() -> Router {
    let grants = vec![
        VestingGrant { beneficiary: ALICE, amount: 500_000 * UNIT },
        VestingGrant { beneficiary: BOB, amount: 500_000 * UNIT },
    ];
    let mut config = DeployConfig::new(DEPLOYER, vec![OWNER_A, OWNER_B], 2).with_vesting(grants);
    config.genesis = genesis();
    Router::deploy(&config).expect("deploy")
}

/// Both owners sign a call from the wallet; panics unless it executes
pub fn wallet_exec(router: &mut Router, destination: Pubkey, payload: Vec<u8>) {
    let outcome = router.wallet_call(destination, 0, payload).expect("wallet call");
    assert_eq!(outcome, ExecutionOutcome::Executed);
}

pub fn start_auction(router: &mut Router) {
    let auction = router.addresses().auction;
    wallet_exec(router, auction, AuctionInstruction::StartAuction.pack());
    assert_eq!(router.auction().stage(), Stage::AuctionStarted);
}
