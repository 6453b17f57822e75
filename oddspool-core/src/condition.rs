//! # Conditions
//!
//! A condition is one binary-outcome market. Its two reserves (`fund_bank`)
//! start as a split of the reinforcement and grow on the side that receives
//! each stake. The lifecycle is one-way:
//!
//! ```text
//! Created ──resolve──▶ Resolved
//!    │
//!    └────cancel────▶ Canceled
//! ```
//!
//! `stopped` is an independent pause flag that only gates new stakes.

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    math::{checked_add, checked_sub, mul_div},
    rewards::Pnl,
    types::{AccountId, ConditionId, Metadata, OracleConditionId, OutcomeId},
    CoreError,
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionState {
    Created,
    Resolved,
    Canceled,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    /// Internal sequential id
    pub id: ConditionId,

    /// Oracle that created (and may resolve) the condition
    pub oracle: AccountId,

    /// Id chosen by the oracle, unique within its namespace
    pub oracle_condition_id: OracleConditionId,

    /// Category of the event
    pub scope_id: u64,

    pub outcomes: [OutcomeId; 2],

    /// Current reserves backing each outcome
    pub fund_bank: [u128; 2],

    /// Total owed to each side if it wins
    pub payouts: [u128; 2],

    /// Total staked on each side
    pub total_net_bets: [u128; 2],

    /// Liquidity locked from the pool at creation
    pub reinforcement: u128,

    /// Margin snapshot (1e9 scale)
    pub margin: u128,

    /// Staking closes and resolution opens at this timestamp
    pub start_time: u64,

    pub metadata: Metadata,

    pub state: ConditionState,

    pub stopped: bool,

    pub outcome_won: Option<OutcomeId>,
}

impl Condition {
    pub fn is_terminal(&self) -> bool {
        self.state != ConditionState::Created
    }

    /// Fail unless the condition is still open.
    pub fn ensure_created(&self) -> Result<()> {
        if self.is_terminal() {
            return Err(CoreError::ConditionAlreadyResolved);
        }
        Ok(())
    }

    /// Position (0 or 1) of `outcome` among the condition's outcomes.
    pub fn outcome_index(&self, outcome: OutcomeId) -> Result<usize> {
        self.outcomes
            .iter()
            .position(|candidate| *candidate == outcome)
            .ok_or(CoreError::WrongOutcome)
    }

    /// Reserves after staking `amount` on side `index`, with the resulting
    /// payout owed to that side. Nothing is written.
    pub fn preview_stake(
        &self,
        index: usize,
        amount: u128,
        odds: u128,
        scale: u128,
    ) -> Result<StakeEffect> {
        let mut fund_bank = self.fund_bank;
        let mut payouts = self.payouts;
        let mut total_net_bets = self.total_net_bets;

        fund_bank[index] = checked_add(fund_bank[index], amount)?;
        payouts[index] = checked_add(payouts[index], mul_div(amount, odds, scale)?)?;
        total_net_bets[index] = checked_add(total_net_bets[index], amount)?;

        Ok(StakeEffect {
            fund_bank,
            payouts,
            total_net_bets,
        })
    }

    pub fn apply_stake(&mut self, effect: StakeEffect) {
        self.fund_bank = effect.fund_bank;
        self.payouts = effect.payouts;
        self.total_net_bets = effect.total_net_bets;
    }

    /// Net result for the pool if side `win_index` wins.
    pub fn resolution_pnl(&self, win_index: usize) -> Result<Pnl> {
        let collected = checked_add(self.total_net_bets[0], self.total_net_bets[1])?;
        let owed = self.payouts[win_index];
        if collected >= owed {
            Ok(Pnl::Profit(checked_sub(collected, owed)?))
        } else {
            Ok(Pnl::Loss(checked_sub(owed, collected)?))
        }
    }
}

/// Reserve changes produced by one stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeEffect {
    pub fund_bank: [u128; 2],
    pub payouts: [u128; 2],
    pub total_net_bets: [u128; 2],
}

/// Split `reinforcement` into the two initial reserves in proportion to
/// `pools`. The two reserves always add up to the whole reinforcement.
pub fn split_reinforcement(reinforcement: u128, pools: [u128; 2]) -> Result<[u128; 2]> {
    if pools[0] == 0 || pools[1] == 0 {
        return Err(CoreError::ZeroOdds);
    }
    let first = mul_div(reinforcement, pools[0], checked_add(pools[0], pools[1])?)?;
    let second = checked_sub(reinforcement, first)?;
    if first == 0 || second == 0 {
        return Err(CoreError::ZeroOdds);
    }
    Ok([first, second])
}
