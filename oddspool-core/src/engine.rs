//! # Core
//!
//! The replaceable logic layer: condition ledger, pricing and bet accounting
//! for one version of the protocol. A [`Core`] never moves liquidity itself;
//! it locks and settles reinforcement through the [`Reserve`] it is handed,
//! and stakes reach it only through the pool router.
//!
//! Every operation validates completely before it writes, so a failing call
//! leaves the core (and the reserve) exactly as it found them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    bet::{Bet, Payout},
    condition::{split_reinforcement, Condition, ConditionState},
    config::CoreConfig,
    error::Result,
    pool::Reserve,
    pricing::odds_from_banks,
    registry::OutcomeRegistry,
    rewards::{Pnl, RewardSplit},
    roles::{AccessControl, Role, RoleSet},
    types::{AccountId, BetId, Call, ConditionId, Metadata, OracleConditionId, OutcomeId},
    CoreError, ODDS_SCALE,
};

/// Parameters of a new condition, as supplied by its oracle.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewCondition {
    pub oracle_condition_id: OracleConditionId,
    pub scope_id: u64,
    /// Relative weight of the two initial reserves
    pub pools: [u128; 2],
    pub outcomes: [OutcomeId; 2],
    pub start_time: u64,
    pub metadata: Metadata,
}

/// A bet accepted by the core, before the pool mints its receipt.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcceptedBet {
    pub bet_id: BetId,
    pub odds: u128,
}

pub struct Core {
    owner: AccountId,
    config: CoreConfig,
    roles: Box<dyn AccessControl + Send + Sync>,
    registry: OutcomeRegistry,
    conditions: BTreeMap<ConditionId, Condition>,
    oracle_conditions: HashMap<(AccountId, OracleConditionId), ConditionId>,
    bets: BTreeMap<BetId, Bet>,
    last_condition_id: ConditionId,
    last_bet_id: BetId,
    open_conditions: usize,
    all_conditions_stopped: bool,
}

impl Core {
    /// A core with an empty in-memory role set.
    pub fn new(owner: AccountId, config: CoreConfig) -> Self {
        Self::with_access_control(owner, config, Box::new(RoleSet::new()))
    }

    pub fn with_access_control(
        owner: AccountId,
        config: CoreConfig,
        roles: Box<dyn AccessControl + Send + Sync>,
    ) -> Self {
        let registry = OutcomeRegistry::new(config.default_reinforcement, config.default_margin);
        Self {
            owner,
            config,
            roles,
            registry,
            conditions: BTreeMap::new(),
            oracle_conditions: HashMap::new(),
            bets: BTreeMap::new(),
            last_condition_id: ConditionId(0),
            last_bet_id: BetId(0),
            open_conditions: 0,
            all_conditions_stopped: false,
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    // ---- roles ----

    fn ensure_owner(&self, call: &Call) -> Result<()> {
        if call.sender != self.owner {
            return Err(CoreError::OnlyOwner);
        }
        Ok(())
    }

    pub fn is_oracle(&self, who: &AccountId) -> bool {
        self.roles.has_role(who, Role::Oracle)
    }

    pub fn is_maintainer(&self, who: &AccountId) -> bool {
        self.roles.has_role(who, Role::Maintainer)
    }

    pub fn set_oracle(&mut self, call: &Call, who: AccountId) -> Result<()> {
        self.ensure_owner(call)?;
        info!(oracle = %who, "oracle added");
        self.roles.grant(who, Role::Oracle);
        Ok(())
    }

    pub fn renounce_oracle(&mut self, call: &Call, who: &AccountId) -> Result<()> {
        self.ensure_owner(call)?;
        info!(oracle = %who, "oracle removed");
        self.roles.revoke(who, Role::Oracle);
        Ok(())
    }

    pub fn add_maintainer(&mut self, call: &Call, who: AccountId) -> Result<()> {
        self.ensure_owner(call)?;
        info!(maintainer = %who, "maintainer added");
        self.roles.grant(who, Role::Maintainer);
        Ok(())
    }

    pub fn remove_maintainer(&mut self, call: &Call, who: &AccountId) -> Result<()> {
        self.ensure_owner(call)?;
        info!(maintainer = %who, "maintainer removed");
        self.roles.revoke(who, Role::Maintainer);
        Ok(())
    }

    // ---- configuration ----

    pub fn update_reinforcements(&mut self, call: &Call, data: &[u128]) -> Result<()> {
        self.roles.ensure(&call.sender, Role::Maintainer)?;
        self.registry.update_reinforcements(data)
    }

    pub fn update_margins(&mut self, call: &Call, data: &[u128]) -> Result<()> {
        self.roles.ensure(&call.sender, Role::Maintainer)?;
        self.registry.update_margins(data)
    }

    pub fn change_max_banks_ratio(&mut self, call: &Call, ratio: u128) -> Result<()> {
        self.roles.ensure(&call.sender, Role::Maintainer)?;
        info!(ratio, "max banks ratio changed");
        self.config.max_banks_ratio = ratio;
        Ok(())
    }

    pub fn reinforcement(&self, outcome: OutcomeId) -> u128 {
        self.registry.reinforcement(outcome)
    }

    pub fn margin(&self, outcome: OutcomeId) -> u128 {
        self.registry.margin(outcome)
    }

    // ---- condition lifecycle ----

    /// Create a condition on behalf of the calling oracle and lock its
    /// reinforcement from `reserve`. Reached through
    /// [`LiquidityPool::create_condition`](crate::LiquidityPool::create_condition)
    /// so the locked amount always comes from the pool's own reserve.
    pub(crate) fn create_condition(
        &mut self,
        call: &Call,
        params: NewCondition,
        reserve: &mut dyn Reserve,
    ) -> Result<ConditionId> {
        self.roles.ensure(&call.sender, Role::Oracle)?;

        let [first, second] = params.outcomes;
        if first == second {
            return Err(CoreError::SameOutcomes);
        }
        if first == 0 || second == 0 {
            return Err(CoreError::WrongOutcome);
        }

        // reinforcement and margin are keyed by the first outcome
        let dependency = self.registry.get(first);
        let fund_bank = split_reinforcement(dependency.reinforcement, params.pools)?;

        if params.start_time == 0 || params.start_time <= call.timestamp {
            return Err(CoreError::IncorrectTimestamp);
        }
        let key = (call.sender.clone(), params.oracle_condition_id);
        if self.oracle_conditions.contains_key(&key) {
            return Err(CoreError::ConditionAlreadyCreated);
        }

        reserve.lock_reserve(dependency.reinforcement)?;

        let id = self.last_condition_id.next();
        let condition = Condition {
            id,
            oracle: call.sender.clone(),
            oracle_condition_id: params.oracle_condition_id,
            scope_id: params.scope_id,
            outcomes: params.outcomes,
            fund_bank,
            payouts: [0, 0],
            total_net_bets: [0, 0],
            reinforcement: dependency.reinforcement,
            margin: dependency.margin,
            start_time: params.start_time,
            metadata: params.metadata,
            state: ConditionState::Created,
            stopped: false,
            outcome_won: None,
        };

        info!(
            condition = %id,
            oracle = %call.sender,
            oracle_condition_id = params.oracle_condition_id,
            reinforcement = dependency.reinforcement,
            start_time = params.start_time,
            "condition created"
        );

        self.last_condition_id = id;
        self.oracle_conditions.insert(key, id);
        self.conditions.insert(id, condition);
        self.open_conditions += 1;
        Ok(id)
    }

    /// Resolve one of the calling oracle's conditions.
    pub(crate) fn resolve_condition(
        &mut self,
        call: &Call,
        oracle_condition_id: OracleConditionId,
        outcome_win: OutcomeId,
        reserve: &mut dyn Reserve,
    ) -> Result<RewardSplit> {
        self.roles.ensure(&call.sender, Role::Oracle)?;
        let id = self.oracle_condition_id(&call.sender, oracle_condition_id)?;
        let condition = self.condition(id)?;

        condition.ensure_created()?;
        if call.timestamp < condition.start_time {
            return Err(CoreError::ConditionNotStarted);
        }
        let win_index = condition.outcome_index(outcome_win)?;
        let pnl = condition.resolution_pnl(win_index)?;

        let split = reserve.settle_reserve(&condition.oracle, condition.reinforcement, pnl)?;

        let condition = self.condition_mut(id)?;
        condition.state = ConditionState::Resolved;
        condition.outcome_won = Some(outcome_win);
        self.open_conditions -= 1;

        info!(
            condition = %id,
            outcome = outcome_win,
            ?pnl,
            oracle_reward = split.oracle,
            dao_reward = split.dao,
            "condition resolved"
        );
        Ok(split)
    }

    /// Cancel one of the calling oracle's conditions.
    pub(crate) fn cancel_by_oracle(
        &mut self,
        call: &Call,
        oracle_condition_id: OracleConditionId,
        reserve: &mut dyn Reserve,
    ) -> Result<()> {
        self.roles.ensure(&call.sender, Role::Oracle)?;
        let id = self.oracle_condition_id(&call.sender, oracle_condition_id)?;
        self.cancel(id, reserve)
    }

    /// Cancel any condition by its internal id.
    pub(crate) fn cancel_by_maintainer(
        &mut self,
        call: &Call,
        id: ConditionId,
        reserve: &mut dyn Reserve,
    ) -> Result<()> {
        self.roles.ensure(&call.sender, Role::Maintainer)?;
        self.cancel(id, reserve)
    }

    fn cancel(&mut self, id: ConditionId, reserve: &mut dyn Reserve) -> Result<()> {
        let condition = self.condition(id)?;
        condition.ensure_created()?;
        reserve.settle_reserve(&condition.oracle, condition.reinforcement, Pnl::NEUTRAL)?;

        self.condition_mut(id)?.state = ConditionState::Canceled;
        self.open_conditions -= 1;
        info!(condition = %id, "condition canceled");
        Ok(())
    }

    /// Move the start of a condition. A start in the past closes staking.
    pub fn shift(&mut self, call: &Call, id: ConditionId, new_start_time: u64) -> Result<()> {
        self.roles.ensure(&call.sender, Role::Maintainer)?;
        let condition = self.condition_mut(id)?;
        condition.ensure_created()?;
        if new_start_time == 0 {
            return Err(CoreError::IncorrectTimestamp);
        }
        info!(
            condition = %id,
            from = condition.start_time,
            to = new_start_time,
            "condition shifted"
        );
        condition.start_time = new_start_time;
        Ok(())
    }

    pub fn stop_condition(&mut self, call: &Call, id: ConditionId, flag: bool) -> Result<()> {
        self.roles.ensure(&call.sender, Role::Maintainer)?;
        let condition = self.condition_mut(id)?;
        condition.ensure_created()?;
        condition.stopped = flag;
        warn!(condition = %id, stopped = flag, "condition pause toggled");
        Ok(())
    }

    pub fn stop_all_conditions(&mut self, call: &Call, flag: bool) -> Result<()> {
        self.roles.ensure(&call.sender, Role::Maintainer)?;
        self.all_conditions_stopped = flag;
        warn!(stopped = flag, "global pause toggled");
        Ok(())
    }

    // ---- betting ----

    /// Odds a stake of `amount` on `outcome` would be filled at right now.
    pub fn calculate_odds(&self, id: ConditionId, amount: u128, outcome: OutcomeId) -> Result<u128> {
        let condition = self.condition(id)?;
        let index = condition.outcome_index(outcome)?;
        let odds = odds_from_banks(
            condition.fund_bank[0],
            condition.fund_bank[1],
            amount,
            index,
            condition.margin,
            ODDS_SCALE,
        )?;
        debug!(condition = %id, amount, outcome, odds, "odds quoted");
        Ok(odds)
    }

    /// Accept a stake routed in by the pool.
    pub(crate) fn put_bet(
        &mut self,
        now: u64,
        id: ConditionId,
        amount: u128,
        outcome: OutcomeId,
        deadline: u64,
        min_odds: u128,
    ) -> Result<AcceptedBet> {
        if amount == 0 {
            return Err(CoreError::ZeroAmount);
        }
        let condition = self.condition(id)?;
        condition.ensure_created()?;
        if now > deadline {
            return Err(CoreError::DeadlineExpired);
        }
        if now >= condition.start_time {
            return Err(CoreError::ConditionStarted);
        }
        if self.all_conditions_stopped || condition.stopped {
            return Err(CoreError::ConditionStopped);
        }
        let index = condition.outcome_index(outcome)?;

        let odds = self.calculate_odds(id, amount, outcome)?;
        if odds < min_odds {
            return Err(CoreError::SmallOdds);
        }

        let effect = condition.preview_stake(index, amount, odds, ODDS_SCALE)?;
        let own = effect.fund_bank[index];
        let other = effect.fund_bank[1 - index];
        if own / other > self.config.max_banks_ratio {
            return Err(CoreError::BigDifference);
        }
        let backing = effect.fund_bank[0]
            .checked_add(effect.fund_bank[1])
            .ok_or(CoreError::ArithmeticOverflow)?;
        if effect.payouts[index] > backing {
            return Err(CoreError::CantAcceptBet);
        }

        let bet_id = self.last_bet_id.next();
        self.condition_mut(id)?.apply_stake(effect);
        self.last_bet_id = bet_id;
        self.bets.insert(
            bet_id,
            Bet {
                id: bet_id,
                condition_id: id,
                amount,
                outcome,
                odds,
                created_at: now,
                settled: false,
            },
        );

        debug!(condition = %id, bet = %bet_id, amount, outcome, odds, "bet accepted");
        Ok(AcceptedBet { bet_id, odds })
    }

    /// What a bet would pay if withdrawn now.
    pub fn view_payout(&self, bet_id: BetId) -> Result<Payout> {
        let bet = self.bet_info(bet_id)?;
        bet.payout(self.condition(bet.condition_id)?)
    }

    /// Settle a bet for the pool, returning the amount to transfer.
    pub(crate) fn resolve_payout(&mut self, bet_id: BetId) -> Result<u128> {
        let bet = self.bets.get_mut(&bet_id).ok_or(CoreError::BetNotExists)?;
        let condition = self
            .conditions
            .get(&bet.condition_id)
            .ok_or(CoreError::ConditionNotExists)?;
        let amount = bet.settle(condition)?;
        debug!(bet = %bet_id, amount, "bet settled");
        Ok(amount)
    }

    // ---- views ----

    pub fn condition(&self, id: ConditionId) -> Result<&Condition> {
        self.conditions.get(&id).ok_or(CoreError::ConditionNotExists)
    }

    fn condition_mut(&mut self, id: ConditionId) -> Result<&mut Condition> {
        self.conditions
            .get_mut(&id)
            .ok_or(CoreError::ConditionNotExists)
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.values()
    }

    pub fn condition_funds(&self, id: ConditionId) -> Result<[u128; 2]> {
        Ok(self.condition(id)?.fund_bank)
    }

    pub fn condition_reinforcement(&self, id: ConditionId) -> Result<u128> {
        Ok(self.condition(id)?.reinforcement)
    }

    /// Internal id of an oracle's condition.
    pub fn oracle_condition_id(
        &self,
        oracle: &AccountId,
        oracle_condition_id: OracleConditionId,
    ) -> Result<ConditionId> {
        self.oracle_conditions
            .get(&(oracle.clone(), oracle_condition_id))
            .copied()
            .ok_or(CoreError::ConditionNotExists)
    }

    pub fn bet_info(&self, bet_id: BetId) -> Result<&Bet> {
        self.bets.get(&bet_id).ok_or(CoreError::BetNotExists)
    }

    pub fn all_conditions_stopped(&self) -> bool {
        self.all_conditions_stopped
    }

    /// True when no condition of this core is still open.
    pub fn all_conditions_resolved(&self) -> bool {
        self.open_conditions == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::LiquidityReserve;
    use crate::test_utils::{constants::*, create_funded_reserve, create_test_core, new_condition};

    fn setup() -> (Core, LiquidityReserve) {
        (create_test_core(), create_funded_reserve())
    }

    fn create(core: &mut Core, reserve: &mut LiquidityReserve, oracle_condition_id: u64) -> ConditionId {
        core.create_condition(
            &Call::new(ORACLE, NOW),
            new_condition(oracle_condition_id),
            reserve,
        )
        .unwrap()
    }

    #[test]
    fn test_oracle_membership() {
        let core = create_test_core();
        assert!(core.is_oracle(&ORACLE.into()));
        assert!(!core.is_oracle(&MAINTAINER.into()));
        assert!(core.is_maintainer(&MAINTAINER.into()));
    }

    #[test]
    fn test_only_owner_manages_roles() {
        let mut core = create_test_core();
        assert_eq!(
            core.set_oracle(&Call::new(ORACLE, NOW), BETTOR.into()),
            Err(CoreError::OnlyOwner)
        );
        core.set_oracle(&Call::new(OWNER, NOW), BETTOR.into()).unwrap();
        assert!(core.is_oracle(&BETTOR.into()));
        core.renounce_oracle(&Call::new(OWNER, NOW), &BETTOR.into())
            .unwrap();
        assert!(!core.is_oracle(&BETTOR.into()));
    }

    #[test]
    fn test_create_condition_splits_reinforcement() {
        let (mut core, mut reserve) = setup();
        let id = create(&mut core, &mut reserve, 1);

        let funds = core.condition_funds(id).unwrap();
        let reinforcement = core.condition_reinforcement(id).unwrap();
        assert_eq!(funds[0], funds[1]);
        assert_eq!(funds[0] + funds[1], reinforcement);
        assert_eq!(reinforcement, core.reinforcement(OUTCOME_WIN));
        assert_eq!(reserve.locked_liquidity(), reinforcement);
        assert_eq!(core.oracle_condition_id(&ORACLE.into(), 1).unwrap(), id);
    }

    #[test]
    fn test_create_condition_validation_order() {
        let (mut core, mut reserve) = setup();
        let call = Call::new(ORACLE, NOW);

        let not_oracle = core.create_condition(&Call::new(BETTOR, NOW), new_condition(1), &mut reserve);
        assert_eq!(not_oracle, Err(CoreError::OnlyOracle));

        let mut same = new_condition(1);
        same.outcomes = [OUTCOME_WIN, OUTCOME_WIN];
        assert_eq!(
            core.create_condition(&call, same, &mut reserve),
            Err(CoreError::SameOutcomes)
        );

        let mut zero_outcome = new_condition(1);
        zero_outcome.outcomes = [0, OUTCOME_WIN];
        assert_eq!(
            core.create_condition(&call, zero_outcome, &mut reserve),
            Err(CoreError::WrongOutcome)
        );

        for pools in [[0, POOL], [POOL, 0]] {
            let mut zero_pool = new_condition(1);
            zero_pool.pools = pools;
            assert_eq!(
                core.create_condition(&call, zero_pool, &mut reserve),
                Err(CoreError::ZeroOdds)
            );
        }

        let mut started = new_condition(1);
        started.start_time = NOW;
        assert_eq!(
            core.create_condition(&call, started, &mut reserve),
            Err(CoreError::IncorrectTimestamp)
        );

        create(&mut core, &mut reserve, 1);
        assert_eq!(
            core.create_condition(&call, new_condition(1), &mut reserve),
            Err(CoreError::ConditionAlreadyCreated)
        );
    }

    #[test]
    fn test_same_id_in_different_oracle_namespaces() {
        let (mut core, mut reserve) = setup();
        let first = create(&mut core, &mut reserve, 7);
        let second = core
            .create_condition(&Call::new(ORACLE2, NOW), new_condition(7), &mut reserve)
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_create_fails_without_liquidity() {
        let mut core = create_test_core();
        let mut reserve = LiquidityReserve::new(Default::default());
        let result = core.create_condition(&Call::new(ORACLE, NOW), new_condition(1), &mut reserve);
        assert_eq!(result, Err(CoreError::NotEnoughLiquidity));
        assert!(core.all_conditions_resolved());
        assert_eq!(
            core.oracle_condition_id(&ORACLE.into(), 1),
            Err(CoreError::ConditionNotExists)
        );
    }

    #[test]
    fn test_registry_snapshot_at_creation() {
        let (mut core, mut reserve) = setup();
        let maintainer = Call::new(MAINTAINER, NOW);
        let before = create(&mut core, &mut reserve, 1);

        let reduced = core.reinforcement(OUTCOME_WIN) / 10;
        assert_eq!(
            core.update_reinforcements(&Call::new(ORACLE, NOW), &[1, reduced]),
            Err(CoreError::OnlyMaintainer)
        );
        core.update_reinforcements(&maintainer, &[OUTCOME_WIN as u128, reduced, OUTCOME_LOSE as u128, reduced])
            .unwrap();
        assert_eq!(
            core.update_margins(&maintainer, &[OUTCOME_WIN as u128, 5_000_000, OUTCOME_LOSE as u128]),
            Err(CoreError::WrongDataFormat)
        );
        core.update_margins(&maintainer, &[OUTCOME_WIN as u128, 5_000_000]).unwrap();

        let after = create(&mut core, &mut reserve, 2);
        assert_eq!(core.condition_reinforcement(after).unwrap(), reduced);
        assert_eq!(core.condition(after).unwrap().margin, 5_000_000);
        assert_eq!(core.condition_reinforcement(before).unwrap(), reduced * 10);
        assert_eq!(core.condition(before).unwrap().margin, 50_000_000);
    }

    #[test]
    fn test_bet_moves_chosen_bank_only() {
        let (mut core, mut reserve) = setup();
        let id = create(&mut core, &mut reserve, 1);
        let before = core.condition_funds(id).unwrap();

        let quoted = core.calculate_odds(id, 100 * TOKEN, OUTCOME_WIN).unwrap();
        let accepted = core
            .put_bet(NOW, id, 100 * TOKEN, OUTCOME_WIN, NOW + 10, quoted)
            .unwrap();
        assert_eq!(accepted.odds, quoted);

        let after = core.condition_funds(id).unwrap();
        assert_eq!(after[0], before[0] + 100 * TOKEN);
        assert_eq!(after[1], before[1]);

        let bet = core.bet_info(accepted.bet_id).unwrap();
        assert_eq!(bet.amount, 100 * TOKEN);
        assert_eq!(bet.created_at, NOW);
        assert!(!bet.settled);
    }

    #[test]
    fn test_bet_guards() {
        let (mut core, mut reserve) = setup();
        let id = create(&mut core, &mut reserve, 1);
        let stake = 100 * TOKEN;

        assert_eq!(
            core.put_bet(NOW, id, 0, OUTCOME_WIN, NOW + 10, 0),
            Err(CoreError::ZeroAmount)
        );
        assert_eq!(
            core.put_bet(NOW, ConditionId(99), stake, OUTCOME_WIN, NOW + 10, 0),
            Err(CoreError::ConditionNotExists)
        );
        assert_eq!(
            core.put_bet(NOW, id, stake, OUTCOME_WIN, NOW - 10, 0),
            Err(CoreError::DeadlineExpired)
        );
        assert_eq!(
            core.put_bet(START, id, stake, OUTCOME_WIN, START + 10, 0),
            Err(CoreError::ConditionStarted)
        );
        assert_eq!(
            core.put_bet(NOW, id, stake, OUTCOME_INCORRECT, NOW + 10, 0),
            Err(CoreError::WrongOutcome)
        );
        assert_eq!(
            core.put_bet(NOW, id, stake, OUTCOME_WIN, NOW + 10, 9_000_000_000),
            Err(CoreError::SmallOdds)
        );

        let quoted = core.calculate_odds(id, stake, OUTCOME_WIN).unwrap();
        assert_eq!(
            core.put_bet(NOW, id, stake, OUTCOME_WIN, NOW + 10, quoted + 1),
            Err(CoreError::SmallOdds)
        );
        // nothing was written by the failed attempts
        assert_eq!(core.condition(id).unwrap().total_net_bets, [0, 0]);
    }

    #[test]
    fn test_big_difference_respects_ratio() {
        let (mut core, mut reserve) = setup();
        let id = create(&mut core, &mut reserve, 1);
        let huge = 100_000_000 * TOKEN;

        assert_eq!(
            core.put_bet(NOW, id, huge, OUTCOME_WIN, NOW + 10, 0),
            Err(CoreError::BigDifference)
        );
        assert_eq!(
            core.change_max_banks_ratio(&Call::new(OWNER, NOW), 10_002),
            Err(CoreError::OnlyMaintainer)
        );
        core.change_max_banks_ratio(&Call::new(MAINTAINER, NOW), 10_002)
            .unwrap();
        core.put_bet(NOW, id, huge, OUTCOME_WIN, NOW + 10, 0).unwrap();
    }

    #[test]
    fn test_cant_accept_uncovered_payout() {
        let (mut core, mut reserve) = setup();
        let id = create(&mut core, &mut reserve, 1);
        // repeated stakes on one side pile up winnings until the reserves
        // no longer cover them
        let stake = 90 * TOKEN;
        let mut accepted = 0;
        let result = loop {
            match core.put_bet(NOW, id, stake, OUTCOME_LOSE, NOW + 10, 0) {
                Ok(_) => accepted += 1,
                Err(err) => break err,
            }
            assert!(accepted < 10_000, "coverage guard never triggered");
        };
        assert_eq!(result, CoreError::CantAcceptBet);

        let condition = core.condition(id).unwrap();
        assert!(condition.payouts[1] <= condition.fund_bank[0] + condition.fund_bank[1]);
    }

    #[test]
    fn test_stop_one_and_all() {
        let (mut core, mut reserve) = setup();
        let first = create(&mut core, &mut reserve, 1);
        let second = create(&mut core, &mut reserve, 2);
        let maintainer = Call::new(MAINTAINER, NOW);
        let stake = 10 * TOKEN;

        assert_eq!(
            core.stop_all_conditions(&Call::new(ORACLE, NOW), true),
            Err(CoreError::OnlyMaintainer)
        );
        core.stop_all_conditions(&maintainer, true).unwrap();
        // conditions created during the pause are paused too
        let third = create(&mut core, &mut reserve, 3);
        for id in [first, second, third] {
            assert_eq!(
                core.put_bet(NOW, id, stake, OUTCOME_WIN, NOW + 10, 0),
                Err(CoreError::ConditionStopped)
            );
        }
        core.stop_all_conditions(&maintainer, false).unwrap();

        core.stop_condition(&maintainer, first, true).unwrap();
        assert_eq!(
            core.put_bet(NOW, first, stake, OUTCOME_WIN, NOW + 10, 0),
            Err(CoreError::ConditionStopped)
        );
        core.put_bet(NOW, second, stake, OUTCOME_WIN, NOW + 10, 0).unwrap();
        core.put_bet(NOW, third, stake, OUTCOME_WIN, NOW + 10, 0).unwrap();

        core.stop_condition(&maintainer, first, false).unwrap();
        core.put_bet(NOW, first, stake, OUTCOME_WIN, NOW + 10, 0).unwrap();
    }

    #[test]
    fn test_shift_closes_and_reopens_staking() {
        let (mut core, mut reserve) = setup();
        let id = create(&mut core, &mut reserve, 1);
        let maintainer = Call::new(MAINTAINER, NOW);

        core.shift(&maintainer, id, NOW - 1).unwrap();
        assert_eq!(
            core.put_bet(NOW, id, TOKEN, OUTCOME_WIN, NOW + 10, 0),
            Err(CoreError::ConditionStarted)
        );
        core.shift(&maintainer, id, START).unwrap();
        core.put_bet(NOW, id, TOKEN, OUTCOME_WIN, NOW + 10, 0).unwrap();
        assert_eq!(
            core.shift(&maintainer, id, 0),
            Err(CoreError::IncorrectTimestamp)
        );
        assert_eq!(core.condition(id).unwrap().start_time, START);
        assert_eq!(
            core.shift(&Call::new(ORACLE, NOW), id, START),
            Err(CoreError::OnlyMaintainer)
        );
    }

    #[test]
    fn test_resolve_rules() {
        let (mut core, mut reserve) = setup();
        create(&mut core, &mut reserve, 1);
        let early = Call::new(ORACLE, NOW);
        let late = Call::new(ORACLE, START);

        assert_eq!(
            core.resolve_condition(&late, 2, OUTCOME_WIN, &mut reserve),
            Err(CoreError::ConditionNotExists)
        );
        assert_eq!(
            core.resolve_condition(&Call::new(BETTOR, START), 1, OUTCOME_WIN, &mut reserve),
            Err(CoreError::OnlyOracle)
        );
        assert_eq!(
            core.resolve_condition(&Call::new(ORACLE2, START), 1, OUTCOME_WIN, &mut reserve),
            Err(CoreError::ConditionNotExists)
        );
        assert_eq!(
            core.resolve_condition(&early, 1, OUTCOME_WIN, &mut reserve),
            Err(CoreError::ConditionNotStarted)
        );
        assert_eq!(
            core.resolve_condition(&late, 1, OUTCOME_INCORRECT, &mut reserve),
            Err(CoreError::WrongOutcome)
        );

        core.resolve_condition(&late, 1, OUTCOME_WIN, &mut reserve)
            .unwrap();
        for outcome in [OUTCOME_WIN, OUTCOME_LOSE] {
            assert_eq!(
                core.resolve_condition(&late, 1, outcome, &mut reserve),
                Err(CoreError::ConditionAlreadyResolved)
            );
        }
        assert!(core.all_conditions_resolved());
        assert_eq!(reserve.locked_liquidity(), 0);
    }

    #[test]
    fn test_cancel_paths() {
        let (mut core, mut reserve) = setup();
        create(&mut core, &mut reserve, 1);
        let second = create(&mut core, &mut reserve, 2);
        let liquidity = reserve.total_liquidity();

        assert_eq!(
            core.cancel_by_oracle(&Call::new(MAINTAINER, NOW), 1, &mut reserve),
            Err(CoreError::OnlyOracle)
        );
        core.cancel_by_oracle(&Call::new(ORACLE, NOW), 1, &mut reserve)
            .unwrap();

        let internal = core.oracle_condition_id(&ORACLE.into(), 2).unwrap();
        assert_eq!(internal, second);
        assert_eq!(
            core.cancel_by_maintainer(&Call::new(ORACLE, NOW), internal, &mut reserve),
            Err(CoreError::OnlyMaintainer)
        );
        core.cancel_by_maintainer(&Call::new(MAINTAINER, NOW), internal, &mut reserve)
            .unwrap();
        assert_eq!(
            core.cancel_by_maintainer(&Call::new(MAINTAINER, NOW), internal, &mut reserve),
            Err(CoreError::ConditionAlreadyResolved)
        );

        assert!(core.all_conditions_resolved());
        assert_eq!(reserve.total_liquidity(), liquidity);
        assert_eq!(reserve.locked_liquidity(), 0);
        assert_eq!(
            core.stop_condition(&Call::new(MAINTAINER, NOW), internal, true),
            Err(CoreError::ConditionAlreadyResolved)
        );
    }

    #[test]
    fn test_payout_views_follow_condition_state() {
        let (mut core, mut reserve) = setup();
        let id = create(&mut core, &mut reserve, 1);
        let win = core.put_bet(NOW, id, 100 * TOKEN, OUTCOME_WIN, NOW + 10, 0).unwrap();
        let lose = core.put_bet(NOW, id, 100 * TOKEN, OUTCOME_LOSE, NOW + 10, 0).unwrap();

        assert_eq!(
            core.resolve_payout(win.bet_id),
            Err(CoreError::ConditionNotStarted)
        );

        core.resolve_condition(&Call::new(ORACLE, START), 1, OUTCOME_WIN, &mut reserve)
            .unwrap();

        let expected = 100 * TOKEN * win.odds / ODDS_SCALE;
        assert!(core.view_payout(win.bet_id).unwrap().is_win());
        assert_eq!(core.resolve_payout(win.bet_id).unwrap(), expected);
        assert_eq!(core.resolve_payout(win.bet_id), Err(CoreError::NoWinNoPrize));
        assert_eq!(core.resolve_payout(lose.bet_id), Err(CoreError::NoWinNoPrize));
        assert_eq!(core.resolve_payout(BetId(99)), Err(CoreError::BetNotExists));
    }
}
