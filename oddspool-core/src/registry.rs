//! # Outcome Dependencies
//!
//! Maps an outcome id to the reinforcement and margin a new condition is
//! created with. Unknown outcomes fall back to the registry defaults.
//! Conditions copy the values when they are created, so later updates only
//! affect conditions created afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::Result, types::OutcomeId, CoreError};

/// Reinforcement and margin applied to a condition at creation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub reinforcement: u128,
    pub margin: u128,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OutcomeRegistry {
    default: Dependency,
    reinforcements: HashMap<OutcomeId, u128>,
    margins: HashMap<OutcomeId, u128>,
}

impl OutcomeRegistry {
    pub fn new(default_reinforcement: u128, default_margin: u128) -> Self {
        Self {
            default: Dependency {
                reinforcement: default_reinforcement,
                margin: default_margin,
            },
            reinforcements: HashMap::new(),
            margins: HashMap::new(),
        }
    }

    pub fn get(&self, outcome: OutcomeId) -> Dependency {
        Dependency {
            reinforcement: self.reinforcement(outcome),
            margin: self.margin(outcome),
        }
    }

    pub fn reinforcement(&self, outcome: OutcomeId) -> u128 {
        self.reinforcements
            .get(&outcome)
            .copied()
            .unwrap_or(self.default.reinforcement)
    }

    pub fn margin(&self, outcome: OutcomeId) -> u128 {
        self.margins
            .get(&outcome)
            .copied()
            .unwrap_or(self.default.margin)
    }

    /// Apply a flat `[outcome, reinforcement, outcome, reinforcement, ...]` batch.
    pub fn update_reinforcements(&mut self, data: &[u128]) -> Result<()> {
        let pairs = parse_pairs(data)?;
        info!(entries = pairs.len(), "updating reinforcements");
        self.reinforcements.extend(pairs);
        Ok(())
    }

    /// Apply a flat `[outcome, margin, outcome, margin, ...]` batch.
    pub fn update_margins(&mut self, data: &[u128]) -> Result<()> {
        let pairs = parse_pairs(data)?;
        info!(entries = pairs.len(), "updating margins");
        self.margins.extend(pairs);
        Ok(())
    }
}

/// Split a flat key/value list into pairs. The whole batch is validated before
/// anything is returned, so a malformed batch changes nothing.
fn parse_pairs(data: &[u128]) -> Result<Vec<(OutcomeId, u128)>> {
    if data.len() % 2 != 0 {
        return Err(CoreError::WrongDataFormat);
    }
    data.chunks_exact(2)
        .map(|pair| {
            let outcome = OutcomeId::try_from(pair[0]).map_err(|_| CoreError::WrongDataFormat)?;
            Ok((outcome, pair[1]))
        })
        .collect()
}
