//! Runtime configuration for cores and the pool router.
//!
//! Both halves have defaults and can be loaded from a JSON file:
//!
//! ```json
//! {
//!   "core": { "default_reinforcement": 20000, "default_margin": 50000000, "max_banks_ratio": 10000 },
//!   "pool": { "oracle_fee": 10000000, "dao_fee": 90000000 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::Result, CoreError, ODDS_SCALE};

/// Default reinforcement: 20,000 whole tokens of an 18-decimal asset.
pub const DEFAULT_REINFORCEMENT: u128 = 20_000 * 1_000_000_000_000_000_000;

/// Default margin: 5%.
pub const DEFAULT_MARGIN: u128 = 50_000_000;

/// Default cap on `bank[chosen] / bank[other]` after a stake.
pub const DEFAULT_MAX_BANKS_RATIO: u128 = 10_000;

/// Default oracle reward: 1% of a condition's profit.
pub const DEFAULT_ORACLE_FEE: u128 = 10_000_000;

/// Default protocol (DAO) reward: 9% of a condition's profit.
pub const DEFAULT_DAO_FEE: u128 = 90_000_000;

/// Per-core settings. Conditions snapshot the registry values at creation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct CoreConfig {
    /// Reinforcement used for outcomes without a registry entry
    pub default_reinforcement: u128,
    /// Margin (1e9 scale) used for outcomes without a registry entry
    pub default_margin: u128,
    /// Maximum ratio between the two reserves after a stake
    pub max_banks_ratio: u128,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_reinforcement: DEFAULT_REINFORCEMENT,
            default_margin: DEFAULT_MARGIN,
            max_banks_ratio: DEFAULT_MAX_BANKS_RATIO,
        }
    }
}

/// Reward percentages applied by the pool at each resolution (1e9 scale).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct PoolConfig {
    pub oracle_fee: u128,
    pub dao_fee: u128,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            oracle_fee: DEFAULT_ORACLE_FEE,
            dao_fee: DEFAULT_DAO_FEE,
        }
    }
}

impl PoolConfig {
    /// Reject fee pairs that would hand out more than the whole profit.
    pub fn validate(&self) -> Result<()> {
        match self.oracle_fee.checked_add(self.dao_fee) {
            Some(total) if total <= ODDS_SCALE => Ok(()),
            _ => Err(CoreError::WrongFee),
        }
    }
}

/// Complete configuration file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OddspoolConfig {
    pub core: CoreConfig,
    pub pool: PoolConfig,
}

impl OddspoolConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.pool.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
