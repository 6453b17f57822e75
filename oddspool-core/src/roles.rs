//! Capability checks for privileged core operations.
//!
//! The core never looks up roles directly; it asks an [`AccessControl`]
//! backend, which makes the membership store swappable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{error::Result, types::AccountId, CoreError};

/// Privileged capabilities known to the core.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// May create, resolve and cancel its own conditions
    Oracle,
    /// May pause, shift, cancel and reconfigure
    Maintainer,
}

impl Role {
    /// The authorization error raised when a caller lacks this role.
    pub fn denied(self) -> CoreError {
        match self {
            Role::Oracle => CoreError::OnlyOracle,
            Role::Maintainer => CoreError::OnlyMaintainer,
        }
    }
}

/// Backend answering "does this identity hold this role".
pub trait AccessControl {
    fn has_role(&self, who: &AccountId, role: Role) -> bool;

    fn grant(&mut self, who: AccountId, role: Role);

    fn revoke(&mut self, who: &AccountId, role: Role);

    /// Fail with the role's authorization error unless `who` holds it.
    fn ensure(&self, who: &AccountId, role: Role) -> Result<()> {
        if self.has_role(who, role) {
            Ok(())
        } else {
            Err(role.denied())
        }
    }
}

/// In-memory role membership.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RoleSet {
    members: HashSet<(AccountId, Role)>,
}

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessControl for RoleSet {
    fn has_role(&self, who: &AccountId, role: Role) -> bool {
        self.members.contains(&(who.clone(), role))
    }

    fn grant(&mut self, who: AccountId, role: Role) {
        self.members.insert((who, role));
    }

    fn revoke(&mut self, who: &AccountId, role: Role) {
        self.members.remove(&(who.clone(), role));
    }
}
