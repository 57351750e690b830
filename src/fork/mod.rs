// Forked-chain fixture
//
// A `Fork` is a deterministic snapshot of the mainnet state the scenarios
// care about: the wrapped-BTC vault, its underlying token, the Global
// Access Control module, and the proxy admin. Fresh forks are bit-for-bit
// identical, and `snapshot`/`restore` give per-test isolation.

pub mod config;

use crate::contracts::gac::GlobalAccessControl;
use crate::contracts::proxy::{LogicId, ProxyAdmin};
use crate::contracts::token::Erc20;
use crate::contracts::vault::{GatedVault, VaultParams};
use crate::types::{Address, BlockNumber};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use config::ForkConfig;

// ===== Pinned mainnet addresses =====

/// byvWBTC vault proxy
pub const VAULT_PROXY: Address =
    Address::from_hex_literal("0x4b92d19c11435614cd49af1b589001b7c08cd4d5");

/// Largest byvWBTC holder at the fork block
pub const WHALE: Address = Address::from_hex_literal("0x6a7ed7a974d4314d2c345bd826daca5501b0aa1e");

/// Tech ops multisig, the treasury target
pub const TECH_OPS: Address =
    Address::from_hex_literal("0x86cbd0ce0c087b482782c181da8d191de18c8275");

/// Dev multisig, governance of the GAC and the vault
pub const DEV_MULTISIG: Address =
    Address::from_hex_literal("0xb65cef03b9b89f99517643226d76e286ee999e77");

/// War-room guardian
pub const GUARDIAN: Address =
    Address::from_hex_literal("0x29f7f8896fb913cf7f9949c623f896a154727919");

/// Proxy admin contract
pub const PROXY_ADMIN: Address =
    Address::from_hex_literal("0x20dce41acca85e8222d6861aa6d23b6c941777bf");

/// Owner of the proxy admin
pub const PROXY_ADMIN_GOV: Address =
    Address::from_hex_literal("0x21cf9b77f88adf8f8c98d7e33fe601dc57bc0893");

/// Known exploiter addresses blacklisted in the scenarios
pub const EXPLOITERS: [Address; 10] = [
    Address::from_hex_literal("0xa33b95ea28542ada32117b60e4f5b4cb7d1fc19b"),
    Address::from_hex_literal("0x4fbf7701b3078b5bed6f3e64df3ae09650ee7de5"),
    Address::from_hex_literal("0x1b1b391d1026a4e3fb7f082ede068b25358a61f2"),
    Address::from_hex_literal("0xecd91d07b1b6b81d24f2a469de8e47e3fe3050fd"),
    Address::from_hex_literal("0x691da2826ac32bbf2a4b5d6f2a07ce07552a9a8e"),
    Address::from_hex_literal("0x91d65d67fc573605bcb0b5e39f9ef6e18afa1586"),
    Address::from_hex_literal("0x0b88a083dc7b8ac2a84eba02e4acb2e5f2d3063c"),
    Address::from_hex_literal("0x2ef1b70f195fd0432f9c36fb2ef7c99629b0398c"),
    Address::from_hex_literal("0xbbfd8041ebde22a7f3e19600b4bab4925cc97f7d"),
    Address::from_hex_literal("0xe06ed65924db2e7b4c83e07079a424c8a36701e5"),
];

// ============

/// Fixture errors
#[derive(Debug, thiserror::Error)]
pub enum ForkError {
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Opaque state snapshot, restorable onto any fork
pub struct Snapshot(Vec<u8>);

/// Deterministic forked-chain state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fork {
    pub block_number: BlockNumber,
    pub token: Erc20,
    pub gac: GlobalAccessControl,
    pub vault: GatedVault,
    pub proxy_admin: ProxyAdmin,
}

impl Fork {
    /// Build the pinned mainnet fixture with default parameters.
    pub fn mainnet() -> Self {
        Self::from_config(&ForkConfig::default())
    }

    /// Build a fixture from explicit parameters.
    ///
    /// The vault, the GAC, and the transferFrom switch all start in their
    /// locked state when `seed_locked` is set, which is how the incident
    /// block looked on chain. Scenarios unwind the locks they need.
    pub fn from_config(config: &ForkConfig) -> Self {
        let mut token = Erc20::new("Wrapped BTC", "WBTC", 8);
        token.mint(VAULT_PROXY, config.underlying_seed);

        let mut gac = GlobalAccessControl::new(DEV_MULTISIG, GUARDIAN);

        let mut vault = GatedVault::new(VaultParams {
            address: VAULT_PROXY,
            affiliate: DEV_MULTISIG,
            manager: DEV_MULTISIG,
            guardian: GUARDIAN,
            treasury: DEV_MULTISIG,
            withdrawal_fee_bps: config.withdrawal_fee_bps,
            withdrawal_max_deviation_bps: config.withdrawal_max_deviation_bps,
        });
        vault.seed_shares(WHALE, config.whale_shares);
        vault.seed_shares(DEV_MULTISIG, config.affiliate_shares);

        if config.seed_locked {
            vault.force_pause();
            gac.force_pause();
            gac.force_disable_transfer_from();
        }

        let mut proxy_admin = ProxyAdmin::new(PROXY_ADMIN_GOV);
        proxy_admin.register(VAULT_PROXY, LogicId::new("byvWBTC", 1));

        debug!(
            block = config.start_block,
            admin = %PROXY_ADMIN,
            underlying = config.underlying_seed,
            shares = config.whale_shares + config.affiliate_shares,
            "fork seeded"
        );

        Self {
            block_number: config.start_block,
            token,
            gac,
            vault,
            proxy_admin,
        }
    }

    /// Deterministic local account, brownie-style `accounts[n]`.
    pub fn dev_account(&self, n: usize) -> Address {
        Address::derive(&format!("dev/{n}"))
    }

    pub fn advance_block(&mut self) {
        self.block_number += 1;
    }

    /// Capture the full fixture state.
    pub fn snapshot(&self) -> Result<Snapshot, ForkError> {
        Ok(Snapshot(bincode::serialize(self)?))
    }

    /// Roll the fixture back to a captured state.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), ForkError> {
        *self = bincode::deserialize(&snapshot.0)?;
        Ok(())
    }
}
