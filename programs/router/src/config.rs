//! Deployment parameters

use dutchsale_auction::AuctionParams;
use dutchsale_common::{Clock, Pubkey, MAX_TOKENS_SOLD, TOTAL_TOKENS, UNIT};
use dutchsale_vesting::VestingConfig;

/// Grant held by a vesting schedule for `beneficiary`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingGrant {
    pub beneficiary: Pubkey,
    pub amount: u128,
}

/// Everything needed to deploy a sale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Deploys the programs and owns the auction
    pub deployer: Pubkey,
    /// Clock at deployment
    pub genesis: Clock,
    /// Multisig owners
    pub owners: Vec<Pubkey>,
    /// Confirmations needed to execute a multisig transaction
    pub required: usize,
    pub daily_limit: u128,
    pub auction: AuctionParams,
    /// Tokens granted straight to the multisig wallet
    pub wallet_grant: u128,
    /// Tokens granted to vesting schedules, one schedule each
    pub vesting_grants: Vec<VestingGrant>,
    pub vesting: VestingConfig,
}

impl DeployConfig {
    /// Single-wallet deployment: every reserved token goes to the wallet
    pub fn new(deployer: Pubkey, owners: Vec<Pubkey>, required: usize) -> Self {
        Self {
            deployer,
            genesis: Clock::default(),
            owners,
            required,
            daily_limit: 0,
            auction: AuctionParams {
                ceiling: 250_000 * UNIT,
                price_factor: 4000,
            },
            wallet_grant: TOTAL_TOKENS - MAX_TOKENS_SOLD,
            vesting_grants: Vec::new(),
            vesting: VestingConfig::default(),
        }
    }

    /// Replace the wallet grant with vesting schedules
    pub fn with_vesting(mut self, grants: Vec<VestingGrant>) -> Self {
        let vested: u128 = grants.iter().map(|g| g.amount).fold(0, u128::saturating_add);
        self.wallet_grant = (TOTAL_TOKENS - MAX_TOKENS_SOLD).saturating_sub(vested);
        self.vesting_grants = grants;
        self
    }
}
