//! Deterministic program addresses
//!
//! Addresses are derived from the deployer and a seed tag, so a deployment
//! always lands on the same addresses.

use dutchsale_common::Pubkey;
use sha2::{Digest, Sha256};

const DOMAIN: &[u8] = b"dutchsale";

/// sha256("dutchsale" || seeds...)
pub fn derive_address(seeds: &[&[u8]]) -> Pubkey {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN);
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.finalize().into()
}

/// Token ledger address: ["token", deployer]
pub fn token_address(deployer: &Pubkey) -> Pubkey {
    derive_address(&[b"token", deployer])
}

/// Auction address: ["auction", deployer]
pub fn auction_address(deployer: &Pubkey) -> Pubkey {
    derive_address(&[b"auction", deployer])
}

/// Multisig wallet address: ["multisig", deployer]
pub fn multisig_address(deployer: &Pubkey) -> Pubkey {
    derive_address(&[b"multisig", deployer])
}

/// Vesting schedule address: ["vesting", deployer, index]
pub fn vesting_address(deployer: &Pubkey, index: u64) -> Pubkey {
    derive_address(&[b"vesting", deployer, &index.to_le_bytes()])
}
