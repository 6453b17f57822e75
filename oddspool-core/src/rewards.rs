//! # Fee & Reward Distribution
//!
//! When a condition resolves at a profit, the profit is split into the
//! resolving oracle's reward, the protocol (DAO) reward and the remainder that
//! stays in the pool. Losses are absorbed by the pool and pay no rewards.
//! Rewards accrue and are paid out only when claimed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::PoolConfig,
    error::Result,
    math::{checked_add, checked_sub, mul_div},
    types::AccountId,
    ODDS_SCALE,
};

/// Net result of a condition for the pool.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pnl {
    Profit(u128),
    Loss(u128),
}

impl Pnl {
    /// Result of a canceled condition: the reinforcement comes back untouched.
    pub const NEUTRAL: Pnl = Pnl::Profit(0);
}

/// How one condition's profit was divided.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardSplit {
    pub oracle: u128,
    pub dao: u128,
    pub pool: u128,
}

/// Split `profit` using the configured percentages (1e9 scale).
pub fn split_profit(profit: u128, config: &PoolConfig) -> Result<RewardSplit> {
    let oracle = mul_div(profit, config.oracle_fee, ODDS_SCALE)?;
    let dao = mul_div(profit, config.dao_fee, ODDS_SCALE)?;
    let pool = checked_sub(profit, checked_add(oracle, dao)?)?;
    Ok(RewardSplit { oracle, dao, pool })
}

/// Accrued, unclaimed rewards.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RewardLedger {
    oracles: HashMap<AccountId, u128>,
    dao: u128,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accrue(&mut self, oracle: &AccountId, split: &RewardSplit) -> Result<()> {
        let current = self.oracle_reward(oracle);
        let oracle_total = checked_add(current, split.oracle)?;
        let dao_total = checked_add(self.dao, split.dao)?;
        self.oracles.insert(oracle.clone(), oracle_total);
        self.dao = dao_total;
        Ok(())
    }

    pub fn oracle_reward(&self, oracle: &AccountId) -> u128 {
        self.oracles.get(oracle).copied().unwrap_or(0)
    }

    pub fn dao_reward(&self) -> u128 {
        self.dao
    }

    /// Zero and return an oracle's balance. Claiming nothing returns zero.
    pub fn claim_oracle(&mut self, oracle: &AccountId) -> u128 {
        let amount = self.oracles.remove(oracle).unwrap_or(0);
        if amount > 0 {
            info!(%oracle, amount, "oracle reward claimed");
        }
        amount
    }

    /// Zero and return the protocol balance.
    pub fn claim_dao(&mut self) -> u128 {
        let amount = std::mem::take(&mut self.dao);
        if amount > 0 {
            info!(amount, "dao reward claimed");
        }
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_default_split() {
        let split = split_profit(100 * TOKEN, &PoolConfig::default()).unwrap();
        assert_eq!(split.oracle, TOKEN);
        assert_eq!(split.dao, 9 * TOKEN);
        assert_eq!(split.pool, 90 * TOKEN);
    }

    #[test]
    fn test_custom_split() {
        let config = PoolConfig {
            oracle_fee: 5_000_000,
            dao_fee: 50_000_000,
        };
        let split = split_profit(100 * TOKEN, &config).unwrap();
        assert_eq!(split.oracle, TOKEN / 2);
        assert_eq!(split.dao, 5 * TOKEN);
        assert_eq!(split.oracle + split.dao + split.pool, 100 * TOKEN);
    }

    #[test]
    fn test_claims_zero_balances() {
        let oracle = AccountId::from("oracle");
        let mut ledger = RewardLedger::new();
        let split = RewardSplit {
            oracle: 1,
            dao: 9,
            pool: 90,
        };
        ledger.accrue(&oracle, &split).unwrap();
        ledger.accrue(&oracle, &split).unwrap();

        assert_eq!(ledger.oracle_reward(&oracle), 2);
        assert_eq!(ledger.claim_oracle(&oracle), 2);
        assert_eq!(ledger.claim_oracle(&oracle), 0);
        assert_eq!(ledger.claim_dao(), 18);
        assert_eq!(ledger.claim_dao(), 0);
    }
}
