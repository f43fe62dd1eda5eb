//! Operator configuration

use anyhow::{Context, Result};
use dutchsale_auction::AuctionParams;
use dutchsale_common::{Clock, Pubkey, MAX_TOKENS_SOLD, TOTAL_TOKENS, UNIT};
use dutchsale_router::{DeployConfig, VestingGrant};
use dutchsale_vesting::{VestingConfig, DEFAULT_CLIFF, DEFAULT_PERIOD};
use model_safety::VestingCurve;
use serde::{Deserialize, Serialize};

/// Env var naming the config file
pub const CONFIG_ENV: &str = "DUTCHSALE_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "dutchsale-config.toml";

/// TOML integers are 64-bit, so token amounts are given in whole tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Deployer and auction owner (base58)
    pub deployer: String,

    /// Block ordinal at deployment
    pub genesis_block: u64,

    /// Timestamp at deployment (seconds)
    pub genesis_timestamp: u64,

    /// Reserved tokens given straight to the multisig wallet (whole tokens)
    pub wallet_grant: u64,

    pub multisig: MultisigConfig,

    pub auction: AuctionConfig,

    pub vesting: VestingSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigConfig {
    /// Owner addresses (base58)
    pub owners: Vec<String>,

    /// Confirmations required
    pub required: usize,

    /// Value-only spending allowed per day (whole tokens of native currency)
    pub daily_limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Funding goal (whole tokens of native currency)
    pub ceiling: u64,

    pub price_factor: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSection {
    pub cliff_secs: u64,

    pub period_secs: u64,

    /// Release in whole steps of this many seconds; linear when absent
    pub step_secs: Option<u64>,

    pub grants: Vec<GrantConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantConfig {
    /// Beneficiary address (base58)
    pub beneficiary: String,

    /// Whole tokens
    pub tokens: u64,
}

/// Decode a base58 address
pub fn parse_address(s: &str) -> Result<Pubkey> {
    let bytes = bs58::decode(s)
        .into_vec()
        .with_context(|| format!("Invalid base58 address: {}", s))?;
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("Address is not 32 bytes: {}", s))
}

/// Encode an address as base58
pub fn format_address(address: &Pubkey) -> String {
    bs58::encode(address).into_string()
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let config_str = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {}", config_path))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Two-of-three wallet selling at ceiling 250_000, all reserved tokens to the wallet
    pub fn default_sale() -> Self {
        Self {
            deployer: format_address(&[0xD0; 32]),
            genesis_block: 0,
            genesis_timestamp: 1_500_000_000,
            wallet_grant: ((TOTAL_TOKENS - MAX_TOKENS_SOLD) / UNIT) as u64,
            multisig: MultisigConfig {
                owners: vec![
                    format_address(&[0x0A; 32]),
                    format_address(&[0x0B; 32]),
                    format_address(&[0x0C; 32]),
                ],
                required: 2,
                daily_limit: 0,
            },
            auction: AuctionConfig {
                ceiling: 250_000,
                price_factor: 4000,
            },
            vesting: VestingSection {
                cliff_secs: DEFAULT_CLIFF,
                period_secs: DEFAULT_PERIOD,
                step_secs: None,
                grants: Vec::new(),
            },
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_sale();
        let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        std::fs::write(path, toml_str).context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }

    /// Resolve addresses and scale amounts for deployment
    pub fn deploy_config(&self) -> Result<DeployConfig> {
        let owners = self
            .multisig
            .owners
            .iter()
            .map(|o| parse_address(o))
            .collect::<Result<Vec<_>>>()?;

        let vesting_grants = self
            .vesting
            .grants
            .iter()
            .map(|g| {
                Ok(VestingGrant {
                    beneficiary: parse_address(&g.beneficiary)?,
                    amount: u128::from(g.tokens) * UNIT,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let curve = match self.vesting.step_secs {
            Some(step_secs) => VestingCurve::Stepped { step_secs },
            None => VestingCurve::Linear,
        };

        Ok(DeployConfig {
            deployer: parse_address(&self.deployer)?,
            genesis: Clock {
                block: self.genesis_block,
                timestamp: self.genesis_timestamp,
            },
            owners,
            required: self.multisig.required,
            daily_limit: u128::from(self.multisig.daily_limit) * UNIT,
            auction: AuctionParams {
                ceiling: u128::from(self.auction.ceiling) * UNIT,
                price_factor: u128::from(self.auction.price_factor),
            },
            wallet_grant: u128::from(self.wallet_grant) * UNIT,
            vesting_grants,
            vesting: VestingConfig {
                cliff: self.vesting.cliff_secs,
                period: self.vesting.period_secs,
                curve,
            },
        })
    }
}
