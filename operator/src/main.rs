//! Dutchsale Operator
//!
//! Deploys a sale on the in-memory ledger from a TOML config, replays a
//! scenario of calls against it and prints where everything ended up.

mod config;
mod scenario;

use anyhow::{Context, Result};
use config::{format_address, Config, DEFAULT_CONFIG_PATH};
use dutchsale_router::Router;
use scenario::{Runner, Scenario, SCENARIO_ENV};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Dutchsale operator");

    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("--write-config") {
        let path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);
        return Config::write_default(path);
    }

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({:#}), using default sale config", e);
        Config::default_sale()
    });

    let scenario = match std::env::var(SCENARIO_ENV) {
        Ok(path) => Scenario::load(&path)?,
        Err(_) => {
            log::info!("No scenario given, replaying the stop-price flow");
            Scenario::stop_price_flow()
        }
    };

    let deploy = config.deploy_config().context("Invalid sale config")?;
    let router = Router::deploy(&deploy).context("Deployment failed")?;
    log_addresses(&router);

    let mut runner = Runner::new(router);
    runner.run(&scenario)?;

    log::info!(
        "Replayed {} steps: {} accepted, {} rejected",
        scenario.steps.len(),
        runner.accepted(),
        runner.rejected()
    );
    log_summary(&runner.router)?;
    Ok(())
}

fn log_addresses(router: &Router) {
    let a = router.addresses();
    log::info!("Token:    {}", format_address(&a.token));
    log::info!("Auction:  {}", format_address(&a.auction));
    log::info!("Multisig: {}", format_address(&a.multisig));
    for (i, v) in a.vestings.iter().enumerate() {
        log::info!("Vesting #{}: {}", i, format_address(v));
    }
}

fn log_summary(router: &Router) -> Result<()> {
    let auction = router.auction();
    let wallet = router.addresses().multisig;

    log::info!("Stage: {:?}", auction.stage());
    log::info!("Total received: {}", auction.total_received());
    log::info!("Final price: {}", auction.final_price());
    log::info!("Token price now: {}", router.calc_token_price()?);
    log::info!("Stop price now: {}", router.calc_stop_price()?);
    log::info!(
        "Wallet: {} native, {} tokens",
        router.native_balance(&wallet),
        router.token_balance(&wallet)
    );

    for bid in auction.bids() {
        let c = auction.contribution(&bid.bidder);
        log::debug!(
            "Bid #{} by {}: {} (contributed {}, claimed {})",
            bid.sequence,
            format_address(&bid.bidder),
            bid.amount,
            c.amount,
            c.claimed
        );
    }

    for address in &router.addresses().vestings {
        let schedule = router.vesting(address)?;
        log::info!(
            "Vesting {}: allocated {}, withdrawn {}, withdrawable now {}",
            format_address(&schedule.beneficiary()),
            schedule.total_allocated(),
            schedule.withdrawn(),
            router.calc_max_withdraw(address)?
        );
    }

    if !router.token().is_conserved() {
        anyhow::bail!("Token supply is not conserved");
    }
    Ok(())
}
