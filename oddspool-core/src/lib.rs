//! # Oddspool Core
//!
//! Core Rust library for a peer-to-pool binary prediction-market engine.
//!
//! Bettors stake against a shared liquidity pool rather than against each
//! other:
//! - Oracles create two-outcome conditions and later resolve or cancel them
//! - Each condition is backed by reinforcement locked from the pool
//! - Odds are quoted from the condition's two reserves with a margin applied
//! - Accepted bets mint a transferable receipt that carries the payout right
//! - Profits pay oracle and protocol rewards; losses are absorbed by the pool
//! - The core holding this logic can be replaced once it has no open conditions
//!
//! ## Features
//!
//! - **Pricing**: Integer fixed-point odds with price impact and margin
//! - **Condition Ledger**: Oracle-namespaced conditions with a one-way lifecycle
//! - **Bet Accounting**: Reserve updates, coverage checks and one-shot payouts
//! - **Rewards**: Configurable oracle/DAO split of each condition's profit
//! - **Core Migration**: Append-only core versions with old receipts still payable
//!
//! ## Examples
//!
//! ```rust
//! use oddspool_core::{
//!     AccountId, Call, Core, CoreConfig, LiquidityPool, Metadata, NewCondition, PoolConfig,
//! };
//!
//! let owner = Call::new("owner", 1_700_000_000);
//! let mut core = Core::new(AccountId::from("owner"), CoreConfig::default());
//! core.set_oracle(&owner, AccountId::from("oracle"))?;
//!
//! let mut pool = LiquidityPool::new("owner".into(), "pool".into(), core, PoolConfig::default())?;
//! pool.add_liquidity(&Call::new("lp", 1_700_000_000), 1_000_000 * 10u128.pow(18))?;
//!
//! // An even condition starting in one hour
//! let condition = pool.create_condition(
//!     &Call::new("oracle", 1_700_000_000),
//!     NewCondition {
//!         oracle_condition_id: 1,
//!         scope_id: 1,
//!         pools: [5_000_000, 5_000_000],
//!         outcomes: [1, 2],
//!         start_time: 1_700_003_600,
//!         metadata: Metadata::from_content("Team A vs Team B"),
//!     },
//! )?;
//!
//! let bet = pool.bet(
//!     &Call::new("alice", 1_700_000_100),
//!     condition,
//!     100 * 10u128.pow(18),
//!     1,
//!     1_700_000_200,
//!     0,
//! )?;
//! println!("Bet placed at odds {}", oddspool_core::format_odds(bet.odds));
//!
//! pool.resolve_condition(&Call::new("oracle", 1_700_003_600), 1, 1)?;
//! let won = pool.withdraw_payout(&Call::new("alice", 1_700_003_700), bet.receipt)?;
//! assert!(won > 100 * 10u128.pow(18));
//! Ok::<(), oddspool_core::CoreError>(())
//! ```

pub mod bet;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod math;
pub mod pool;
pub mod pricing;
pub mod receipt;
pub mod registry;
pub mod rewards;
pub mod roles;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use bet::{Bet, Payout, PayoutKind};
pub use condition::{Condition, ConditionState};
pub use config::{CoreConfig, OddspoolConfig, PoolConfig};
pub use engine::{AcceptedBet, Core, NewCondition};
pub use error::{CoreError, Result};
pub use pool::{BetReceipt, LiquidityPool, LiquidityReserve, Reserve};
pub use receipt::{ReceiptBook, ReceiptToken};
pub use rewards::{Pnl, RewardSplit};
pub use roles::{AccessControl, Role, RoleSet};
pub use types::*;
pub use utils::*;

/// Fixed-point scale of odds, margins and fees (1.0 == 1e9)
pub const ODDS_SCALE: u128 = 1_000_000_000;

/// Fixed-point scale of liquidity withdrawal fractions (100% == 1e12)
pub const LIQUIDITY_SCALE: u128 = 1_000_000_000_000;
