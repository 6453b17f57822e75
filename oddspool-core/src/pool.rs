//! # Liquidity Pool
//!
//! The pool is the stable entry point of the protocol. It owns the liquidity
//! providers' capital, routes stakes to the active [`Core`], mints a receipt
//! for every accepted bet and pays out against those receipts.
//!
//! Cores are kept in an append-only list indexed by [`CoreVersion`]. The last
//! one is active; earlier ones stay readable so that receipts minted against
//! them can still be paid after a migration.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    bet::Payout,
    config::PoolConfig,
    engine::{Core, NewCondition},
    error::Result,
    math::{checked_add, checked_sub, mul_div},
    receipt::{ReceiptBook, ReceiptToken},
    rewards::{split_profit, Pnl, RewardLedger, RewardSplit},
    types::{AccountId, BetId, Call, ConditionId, CoreVersion, DepositId, OracleConditionId, OutcomeId, ReceiptId},
    CoreError, LIQUIDITY_SCALE,
};

/// Liquidity hooks a core uses to lock and release condition reinforcement.
pub trait Reserve {
    /// Lock `amount` of free liquidity for a new condition.
    fn lock_reserve(&mut self, amount: u128) -> Result<()>;

    /// Release a condition's `locked` reinforcement, book its result and
    /// accrue rewards for `oracle`. Either everything is applied or nothing.
    fn settle_reserve(&mut self, oracle: &AccountId, locked: u128, pnl: Pnl) -> Result<RewardSplit>;
}

/// One provider's position, measured in pool shares.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Deposit {
    pub owner: AccountId,
    pub shares: u128,
}

/// Provider capital, locked reinforcement and accrued rewards.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LiquidityReserve {
    total_liquidity: u128,
    locked_liquidity: u128,
    total_shares: u128,
    deposits: BTreeMap<DepositId, Deposit>,
    last_deposit_id: DepositId,
    config: PoolConfig,
    rewards: RewardLedger,
}

impl LiquidityReserve {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn total_liquidity(&self) -> u128 {
        self.total_liquidity
    }

    pub fn locked_liquidity(&self) -> u128 {
        self.locked_liquidity
    }

    /// Liquidity not backing any open condition.
    pub fn free_liquidity(&self) -> u128 {
        self.total_liquidity.saturating_sub(self.locked_liquidity)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn rewards(&self) -> &RewardLedger {
        &self.rewards
    }

    pub fn deposit(&self, id: DepositId) -> Result<&Deposit> {
        self.deposits.get(&id).ok_or(CoreError::DepositNotExists)
    }

    /// Current value of a deposit's shares.
    pub fn deposit_value(&self, id: DepositId) -> Result<u128> {
        let deposit = self.deposit(id)?;
        self.shares_value(deposit.shares)
    }

    fn shares_value(&self, shares: u128) -> Result<u128> {
        if self.total_shares == 0 {
            return Ok(0);
        }
        mul_div(shares, self.total_liquidity, self.total_shares)
    }

    pub fn add_liquidity(&mut self, owner: &AccountId, amount: u128) -> Result<DepositId> {
        if amount == 0 {
            return Err(CoreError::ZeroAmount);
        }
        let shares = if self.total_shares == 0 || self.total_liquidity == 0 {
            amount
        } else {
            mul_div(amount, self.total_shares, self.total_liquidity)?
        };
        let total_liquidity = checked_add(self.total_liquidity, amount)?;
        let total_shares = checked_add(self.total_shares, shares)?;

        let id = self.last_deposit_id.next();
        self.total_liquidity = total_liquidity;
        self.total_shares = total_shares;
        self.last_deposit_id = id;
        self.deposits.insert(
            id,
            Deposit {
                owner: owner.clone(),
                shares,
            },
        );
        info!(deposit = %id, %owner, amount, shares, "liquidity added");
        Ok(id)
    }

    /// Withdraw `fraction` (1e12 = everything) of a deposit.
    pub fn withdraw_liquidity(
        &mut self,
        owner: &AccountId,
        id: DepositId,
        fraction: u128,
    ) -> Result<u128> {
        if fraction == 0 || fraction > LIQUIDITY_SCALE {
            return Err(CoreError::WrongDataFormat);
        }
        let deposit = self.deposit(id)?;
        if &deposit.owner != owner {
            return Err(CoreError::LiquidityNotOwned);
        }

        let shares = if fraction == LIQUIDITY_SCALE {
            deposit.shares
        } else {
            mul_div(deposit.shares, fraction, LIQUIDITY_SCALE)?
        };
        let amount = self.shares_value(shares)?;
        if amount > self.free_liquidity() {
            return Err(CoreError::NotEnoughLiquidity);
        }

        let remaining = checked_sub(deposit.shares, shares)?;
        self.total_shares = checked_sub(self.total_shares, shares)?;
        self.total_liquidity = checked_sub(self.total_liquidity, amount)?;
        if remaining == 0 {
            self.deposits.remove(&id);
        } else if let Some(deposit) = self.deposits.get_mut(&id) {
            deposit.shares = remaining;
        }
        info!(deposit = %id, %owner, amount, fraction, "liquidity withdrawn");
        Ok(amount)
    }
}

impl Reserve for LiquidityReserve {
    fn lock_reserve(&mut self, amount: u128) -> Result<()> {
        if amount > self.free_liquidity() {
            return Err(CoreError::NotEnoughLiquidity);
        }
        self.locked_liquidity = checked_add(self.locked_liquidity, amount)?;
        debug!(amount, locked = self.locked_liquidity, "reserve locked");
        Ok(())
    }

    fn settle_reserve(&mut self, oracle: &AccountId, locked: u128, pnl: Pnl) -> Result<RewardSplit> {
        let locked_liquidity = checked_sub(self.locked_liquidity, locked)?;
        let (split, total_liquidity) = match pnl {
            Pnl::Profit(profit) => {
                let split = split_profit(profit, &self.config)?;
                (split, checked_add(self.total_liquidity, split.pool)?)
            }
            Pnl::Loss(loss) => (
                RewardSplit::default(),
                self.total_liquidity
                    .checked_sub(loss)
                    .ok_or(CoreError::NotEnoughLiquidity)?,
            ),
        };

        let mut rewards = self.rewards.clone();
        rewards.accrue(oracle, &split)?;

        self.rewards = rewards;
        self.locked_liquidity = locked_liquidity;
        self.total_liquidity = total_liquidity;
        debug!(locked, ?pnl, total = total_liquidity, "reserve settled");
        Ok(split)
    }
}

/// Where a receipt's bet lives.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub core: CoreVersion,
    pub bet_id: BetId,
}

/// A stake accepted through the pool.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BetReceipt {
    pub receipt: ReceiptId,
    pub odds: u128,
}

pub struct LiquidityPool {
    owner: AccountId,
    cores: Vec<Core>,
    reserve: LiquidityReserve,
    receipts: Box<dyn ReceiptToken + Send + Sync>,
    tickets: HashMap<ReceiptId, Ticket>,
}

impl LiquidityPool {
    /// A pool acting as `identity` (the only account allowed to burn its
    /// receipts), owned by `owner`, with `core` as its first version.
    pub fn new(owner: AccountId, identity: AccountId, core: Core, config: PoolConfig) -> Result<Self> {
        Self::with_receipts(owner, core, config, Box::new(ReceiptBook::new(identity)))
    }

    pub fn with_receipts(
        owner: AccountId,
        core: Core,
        config: PoolConfig,
        receipts: Box<dyn ReceiptToken + Send + Sync>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            owner,
            cores: vec![core],
            reserve: LiquidityReserve::new(config),
            receipts,
            tickets: HashMap::new(),
        })
    }

    fn ensure_owner(&self, call: &Call) -> Result<()> {
        if call.sender != self.owner {
            return Err(CoreError::OnlyOwner);
        }
        Ok(())
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    // ---- cores ----

    pub fn active_version(&self) -> CoreVersion {
        CoreVersion(self.cores.len() - 1)
    }

    /// The active core.
    pub fn core(&self) -> &Core {
        &self.cores[self.cores.len() - 1]
    }

    /// The active core, for configuration calls that do not move liquidity.
    pub fn core_mut(&mut self) -> &mut Core {
        let active = self.cores.len() - 1;
        &mut self.cores[active]
    }

    pub fn core_at(&self, version: CoreVersion) -> Result<&Core> {
        self.cores
            .get(version.0)
            .ok_or(CoreError::ConditionNotExists)
    }

    /// Replace the active core. Only allowed once every condition of the
    /// current core has been resolved or canceled.
    pub fn change_core(&mut self, call: &Call, core: Core) -> Result<CoreVersion> {
        self.ensure_owner(call)?;
        if !self.core().all_conditions_resolved() {
            return Err(CoreError::PaymentLocked);
        }
        self.cores.push(core);
        let version = self.active_version();
        info!(%version, "core changed");
        Ok(version)
    }

    // ---- oracle routing ----

    pub fn create_condition(&mut self, call: &Call, params: NewCondition) -> Result<ConditionId> {
        let active = self.cores.len() - 1;
        self.cores[active].create_condition(call, params, &mut self.reserve)
    }

    pub fn resolve_condition(
        &mut self,
        call: &Call,
        oracle_condition_id: OracleConditionId,
        outcome_win: OutcomeId,
    ) -> Result<RewardSplit> {
        let active = self.cores.len() - 1;
        self.cores[active].resolve_condition(call, oracle_condition_id, outcome_win, &mut self.reserve)
    }

    pub fn cancel_by_oracle(&mut self, call: &Call, oracle_condition_id: OracleConditionId) -> Result<()> {
        let active = self.cores.len() - 1;
        self.cores[active].cancel_by_oracle(call, oracle_condition_id, &mut self.reserve)
    }

    pub fn cancel_by_maintainer(&mut self, call: &Call, id: ConditionId) -> Result<()> {
        let active = self.cores.len() - 1;
        self.cores[active].cancel_by_maintainer(call, id, &mut self.reserve)
    }

    // ---- betting ----

    /// Stake `amount` on `outcome` of a condition on the active core and mint
    /// a receipt to the caller.
    pub fn bet(
        &mut self,
        call: &Call,
        condition_id: ConditionId,
        amount: u128,
        outcome: OutcomeId,
        deadline: u64,
        min_odds: u128,
    ) -> Result<BetReceipt> {
        let core = self.active_version();
        let accepted =
            self.core_mut()
                .put_bet(call.timestamp, condition_id, amount, outcome, deadline, min_odds)?;
        let receipt = self.receipts.mint(&call.sender);
        self.tickets.insert(
            receipt,
            Ticket {
                core,
                bet_id: accepted.bet_id,
            },
        );
        info!(
            %receipt,
            bettor = %call.sender,
            condition = %condition_id,
            amount,
            odds = accepted.odds,
            "bet placed"
        );
        Ok(BetReceipt {
            receipt,
            odds: accepted.odds,
        })
    }

    pub fn ticket(&self, receipt: ReceiptId) -> Result<Ticket> {
        self.tickets
            .get(&receipt)
            .copied()
            .ok_or(CoreError::ReceiptNotExists)
    }

    pub fn view_payout(&self, receipt: ReceiptId) -> Result<Payout> {
        let ticket = self.ticket(receipt)?;
        self.core_at(ticket.core)?.view_payout(ticket.bet_id)
    }

    /// Pay the caller what its receipt has won.
    pub fn withdraw_payout(&mut self, call: &Call, receipt: ReceiptId) -> Result<u128> {
        let ticket = self.ticket(receipt)?;
        if self.receipts.owner_of(receipt)? != call.sender {
            return Err(CoreError::OnlyBetOwner);
        }
        let core = self
            .cores
            .get_mut(ticket.core.0)
            .ok_or(CoreError::ConditionNotExists)?;
        let amount = core.resolve_payout(ticket.bet_id)?;
        info!(%receipt, owner = %call.sender, amount, core = %ticket.core, "payout withdrawn");
        Ok(amount)
    }

    pub fn receipts(&self) -> &dyn ReceiptToken {
        self.receipts.as_ref()
    }

    /// Receipt ledger, for transfers and approvals.
    pub fn receipts_mut(&mut self) -> &mut dyn ReceiptToken {
        self.receipts.as_mut()
    }

    // ---- liquidity ----

    pub fn reserve(&self) -> &LiquidityReserve {
        &self.reserve
    }

    pub fn add_liquidity(&mut self, call: &Call, amount: u128) -> Result<DepositId> {
        self.reserve.add_liquidity(&call.sender, amount)
    }

    pub fn withdraw_liquidity(&mut self, call: &Call, deposit: DepositId, fraction: u128) -> Result<u128> {
        self.reserve.withdraw_liquidity(&call.sender, deposit, fraction)
    }

    // ---- rewards ----

    pub fn oracle_reward(&self, oracle: &AccountId) -> u128 {
        self.reserve.rewards.oracle_reward(oracle)
    }

    pub fn dao_reward(&self) -> u128 {
        self.reserve.rewards.dao_reward()
    }

    pub fn claim_oracle_reward(&mut self, call: &Call) -> u128 {
        self.reserve.rewards.claim_oracle(&call.sender)
    }

    pub fn claim_dao_reward(&mut self, call: &Call) -> Result<u128> {
        self.ensure_owner(call)?;
        Ok(self.reserve.rewards.claim_dao())
    }

    pub fn change_oracle_reward(&mut self, call: &Call, fee: u128) -> Result<()> {
        self.ensure_owner(call)?;
        let config = PoolConfig {
            oracle_fee: fee,
            ..self.reserve.config.clone()
        };
        config.validate()?;
        info!(fee, "oracle reward changed");
        self.reserve.config = config;
        Ok(())
    }

    pub fn change_dao_reward(&mut self, call: &Call, fee: u128) -> Result<()> {
        self.ensure_owner(call)?;
        let config = PoolConfig {
            dao_fee: fee,
            ..self.reserve.config.clone()
        };
        config.validate()?;
        info!(fee, "dao reward changed");
        self.reserve.config = config;
        Ok(())
    }
}
