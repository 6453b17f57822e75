//! Bet receipts.
//!
//! A receipt is the bearer right to a bet's payout. It is minted by the pool
//! when a stake is accepted, can be transferred or approved like any token,
//! and is never burned on settlement: settling only flags the bet, so the
//! receipt stays inspectable afterwards.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    error::Result,
    types::{AccountId, ReceiptId},
    CoreError,
};

/// Token collaborator the pool mints receipts through.
pub trait ReceiptToken {
    /// Mint a new receipt to `to`.
    fn mint(&mut self, to: &AccountId) -> ReceiptId;

    fn owner_of(&self, id: ReceiptId) -> Result<AccountId>;

    fn balance_of(&self, owner: &AccountId) -> usize;

    fn tokens_of_owner(&self, owner: &AccountId) -> Vec<ReceiptId>;

    /// Move `id` from `from` to `to`; `caller` must be the owner, the approved
    /// account for `id`, or an operator of the owner.
    fn transfer_from(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        id: ReceiptId,
    ) -> Result<()>;

    fn approve(&mut self, caller: &AccountId, spender: &AccountId, id: ReceiptId) -> Result<()>;

    fn set_approval_for_all(&mut self, owner: &AccountId, operator: &AccountId, approved: bool);

    /// Only the minting pool may burn.
    fn burn(&mut self, caller: &AccountId, id: ReceiptId) -> Result<()>;
}

/// In-memory receipt ledger.
#[derive(Clone, Debug)]
pub struct ReceiptBook {
    minter: AccountId,
    last_id: ReceiptId,
    owners: BTreeMap<ReceiptId, AccountId>,
    approvals: HashMap<ReceiptId, AccountId>,
    operators: HashSet<(AccountId, AccountId)>,
}

impl ReceiptBook {
    /// A ledger whose receipts can only be burned by `minter`.
    pub fn new(minter: AccountId) -> Self {
        Self {
            minter,
            last_id: ReceiptId(0),
            owners: BTreeMap::new(),
            approvals: HashMap::new(),
            operators: HashSet::new(),
        }
    }

    pub fn minter(&self) -> &AccountId {
        &self.minter
    }

    /// Receipt at position `index` in mint order.
    pub fn token_by_index(&self, index: usize) -> Option<ReceiptId> {
        self.owners.keys().nth(index).copied()
    }

    fn is_authorized(&self, caller: &AccountId, owner: &AccountId, id: ReceiptId) -> bool {
        caller == owner
            || self.approvals.get(&id) == Some(caller)
            || self.operators.contains(&(owner.clone(), caller.clone()))
    }
}

impl ReceiptToken for ReceiptBook {
    fn mint(&mut self, to: &AccountId) -> ReceiptId {
        self.last_id = self.last_id.next();
        self.owners.insert(self.last_id, to.clone());
        self.last_id
    }

    fn owner_of(&self, id: ReceiptId) -> Result<AccountId> {
        self.owners
            .get(&id)
            .cloned()
            .ok_or(CoreError::ReceiptNotExists)
    }

    fn balance_of(&self, owner: &AccountId) -> usize {
        self.owners.values().filter(|holder| *holder == owner).count()
    }

    fn tokens_of_owner(&self, owner: &AccountId) -> Vec<ReceiptId> {
        self.owners
            .iter()
            .filter(|(_, holder)| *holder == owner)
            .map(|(id, _)| *id)
            .collect()
    }

    fn transfer_from(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        id: ReceiptId,
    ) -> Result<()> {
        let owner = self.owner_of(id)?;
        if &owner != from || !self.is_authorized(caller, &owner, id) {
            return Err(CoreError::NotApproved);
        }
        self.approvals.remove(&id);
        self.owners.insert(id, to.clone());
        Ok(())
    }

    fn approve(&mut self, caller: &AccountId, spender: &AccountId, id: ReceiptId) -> Result<()> {
        let owner = self.owner_of(id)?;
        if caller != &owner && !self.operators.contains(&(owner.clone(), caller.clone())) {
            return Err(CoreError::NotApproved);
        }
        self.approvals.insert(id, spender.clone());
        Ok(())
    }

    fn set_approval_for_all(&mut self, owner: &AccountId, operator: &AccountId, approved: bool) {
        let key = (owner.clone(), operator.clone());
        if approved {
            self.operators.insert(key);
        } else {
            self.operators.remove(&key);
        }
    }

    fn burn(&mut self, caller: &AccountId, id: ReceiptId) -> Result<()> {
        if caller != &self.minter {
            return Err(CoreError::OnlyLp);
        }
        self.owner_of(id)?;
        self.owners.remove(&id);
        self.approvals.remove(&id);
        Ok(())
    }
}
