//! Accepted stakes and their payouts.

use serde::{Deserialize, Serialize};

use crate::{
    condition::{Condition, ConditionState},
    error::Result,
    math::mul_div,
    types::{BetId, ConditionId, OutcomeId},
    CoreError, ODDS_SCALE,
};

/// One accepted wager. Odds are locked when the bet is accepted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Bet {
    pub id: BetId,
    pub condition_id: ConditionId,
    pub amount: u128,
    pub outcome: OutcomeId,
    /// Locked odds (1e9 scale)
    pub odds: u128,
    pub created_at: u64,
    /// Set once the payout has been withdrawn
    pub settled: bool,
}

/// Why a bet pays what it pays.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayoutKind {
    /// Resolved in the bet's favour
    Win,
    /// Condition canceled, stake returned
    Refund,
    /// Resolved against the bet
    Lose,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub kind: PayoutKind,
    /// Amount withdrawable right now (zero once settled)
    pub amount: u128,
}

impl Payout {
    pub fn is_win(&self) -> bool {
        self.kind == PayoutKind::Win
    }
}

impl Bet {
    /// `floor(amount * odds / 1e9)`
    pub fn winning_payout(&self) -> Result<u128> {
        mul_div(self.amount, self.odds, ODDS_SCALE)
    }

    /// What this bet pays against the (terminal) state of its condition.
    pub fn payout(&self, condition: &Condition) -> Result<Payout> {
        let (kind, amount) = match condition.state {
            ConditionState::Created => return Err(CoreError::ConditionNotStarted),
            ConditionState::Canceled => (PayoutKind::Refund, self.amount),
            ConditionState::Resolved if condition.outcome_won == Some(self.outcome) => {
                (PayoutKind::Win, self.winning_payout()?)
            }
            ConditionState::Resolved => (PayoutKind::Lose, 0),
        };
        let amount = if self.settled { 0 } else { amount };
        Ok(Payout { kind, amount })
    }

    /// Settle the bet once, returning the amount to pay out.
    pub fn settle(&mut self, condition: &Condition) -> Result<u128> {
        let payout = self.payout(condition)?;
        if payout.amount == 0 {
            return Err(CoreError::NoWinNoPrize);
        }
        self.settled = true;
        Ok(payout.amount)
    }
}
