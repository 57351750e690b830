// Fork configuration
// Loadable from JSON so a scenario run can pin different seed parameters.

use crate::types::{Balance, BlockNumber, Bps, MAX_BPS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seed parameters for a forked-chain fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkConfig {
    /// Block the fork is pinned at
    pub start_block: BlockNumber,

    /// Vault withdrawal fee
    pub withdrawal_fee_bps: Bps,

    pub withdrawal_max_deviation_bps: Bps,

    /// Underlying held by the vault at the fork block (satoshi scale)
    pub underlying_seed: Balance,

    /// Share balances at the fork block
    pub whale_shares: Balance,
    pub affiliate_shares: Balance,

    /// Start with the vault paused, the GAC paused, and transferFrom
    /// disabled, matching the incident block.
    pub seed_locked: bool,
}

impl Default for ForkConfig {
    fn default() -> Self {
        Self {
            start_block: 13_916_166,
            withdrawal_fee_bps: 50,
            withdrawal_max_deviation_bps: 50,
            underlying_seed: 85_000_000_000,
            whale_shares: 79_200_000_000,
            affiliate_shares: 800_000_000,
            seed_locked: true,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ForkConfig {
    /// Load and validate a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: ForkConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.withdrawal_fee_bps > MAX_BPS {
            return Err(ConfigError::Invalid(format!(
                "withdrawal_fee_bps {} exceeds {}",
                self.withdrawal_fee_bps, MAX_BPS
            )));
        }
        if self.withdrawal_max_deviation_bps > MAX_BPS {
            return Err(ConfigError::Invalid(format!(
                "withdrawal_max_deviation_bps {} exceeds {}",
                self.withdrawal_max_deviation_bps, MAX_BPS
            )));
        }

        let total_shares = self.whale_shares.saturating_add(self.affiliate_shares);
        if total_shares == 0 {
            return Err(ConfigError::Invalid("no shares seeded".to_string()));
        }
        if self.underlying_seed < total_shares {
            return Err(ConfigError::Invalid(
                "underlying must cover the share supply (price per share >= 1)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_valid() {
        ForkConfig::default().validate().unwrap();
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&ForkConfig {
            withdrawal_fee_bps: 10,
            ..ForkConfig::default()
        })
        .unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = ForkConfig::load(file.path()).unwrap();
        assert_eq!(config.withdrawal_fee_bps, 10);
        assert_eq!(config.start_block, ForkConfig::default().start_block);
    }

    #[test]
    fn test_fee_above_full_scale_rejected() {
        let config = ForkConfig {
            withdrawal_fee_bps: MAX_BPS + 1,
            ..ForkConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_underwater_seed_rejected() {
        let config = ForkConfig {
            underlying_seed: 1,
            ..ForkConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
