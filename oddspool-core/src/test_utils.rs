//! Common test utilities for oddspool-core tests.
//!
//! Shared fixtures for conditions, cores, reserves and pools so each module's
//! tests start from the same, already-permissioned setup.

use crate::{
    condition::{Condition, ConditionState},
    config::{CoreConfig, PoolConfig},
    engine::{Core, NewCondition},
    pool::{LiquidityPool, LiquidityReserve},
    types::{AccountId, Call, ConditionId, Metadata},
};

use self::constants::*;

/// A fresh two-outcome condition with 10,000 units on each side.
pub fn create_test_condition() -> Condition {
    Condition {
        id: ConditionId(1),
        oracle: ORACLE.into(),
        oracle_condition_id: 1,
        scope_id: 1,
        outcomes: [OUTCOME_WIN, OUTCOME_LOSE],
        fund_bank: [10_000, 10_000],
        payouts: [0, 0],
        total_net_bets: [0, 0],
        reinforcement: 20_000,
        margin: 50_000_000,
        start_time: START,
        metadata: Metadata::from_content("Team A vs Team B"),
        state: ConditionState::Created,
        stopped: false,
        outcome_won: None,
    }
}

/// A core with default settings, two oracles and one maintainer.
pub fn create_test_core() -> Core {
    let owner = Call::new(OWNER, NOW);
    let mut core = Core::new(OWNER.into(), CoreConfig::default());
    core.set_oracle(&owner, ORACLE.into()).unwrap();
    core.set_oracle(&owner, ORACLE2.into()).unwrap();
    core.add_maintainer(&owner, MAINTAINER.into()).unwrap();
    core
}

/// A reserve holding enough liquidity for a handful of default conditions.
pub fn create_funded_reserve() -> LiquidityReserve {
    let mut reserve = LiquidityReserve::new(PoolConfig::default());
    reserve
        .add_liquidity(&AccountId::from(LP), INITIAL_LIQUIDITY)
        .unwrap();
    reserve
}

/// A funded pool routing to [`create_test_core`].
pub fn create_test_pool() -> LiquidityPool {
    let mut pool = LiquidityPool::new(
        OWNER.into(),
        POOL_ACCOUNT.into(),
        create_test_core(),
        PoolConfig::default(),
    )
    .unwrap();
    pool.add_liquidity(&Call::new(LP, NOW), INITIAL_LIQUIDITY)
        .unwrap();
    pool
}

/// Parameters for an evenly weighted condition starting at [`START`].
pub fn new_condition(oracle_condition_id: u64) -> NewCondition {
    NewCondition {
        oracle_condition_id,
        scope_id: 1,
        pools: [POOL, POOL],
        outcomes: [OUTCOME_WIN, OUTCOME_LOSE],
        start_time: START,
        metadata: Metadata::from_content("Team A vs Team B"),
    }
}

/// Common test constants
pub mod constants {
    pub const OWNER: &str = "owner";
    pub const POOL_ACCOUNT: &str = "pool";
    pub const ORACLE: &str = "oracle";
    pub const ORACLE2: &str = "oracle2";
    pub const MAINTAINER: &str = "maintainer";
    pub const BETTOR: &str = "bettor";
    pub const BETTOR2: &str = "bettor2";
    pub const LP: &str = "lp";

    /// Jan 1, 2025
    pub const NOW: u64 = 1735689600;

    /// One hour after [`NOW`]
    pub const START: u64 = NOW + 3600;

    /// One whole token of an 18-decimal asset
    pub const TOKEN: u128 = 1_000_000_000_000_000_000;

    pub const INITIAL_LIQUIDITY: u128 = 1_000_000 * TOKEN;

    /// Initial pool weight for each side of an even condition
    pub const POOL: u128 = 5_000_000;

    pub const OUTCOME_WIN: u64 = 1;
    pub const OUTCOME_LOSE: u64 = 2;
    pub const OUTCOME_INCORRECT: u64 = 3;
}
