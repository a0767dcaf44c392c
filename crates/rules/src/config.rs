//! Evaluator configuration.

use serde::{Deserialize, Serialize};

use cyclecount_core::{DomainError, DomainResult};

use crate::history::InventoryState;

/// Tunables for [`crate::RuleEvaluator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Inventory states that count as a past (or in-progress) count when
    /// looking up history.
    #[serde(default = "default_counted_states")]
    pub counted_states: Vec<InventoryState>,
}

fn default_counted_states() -> Vec<InventoryState> {
    InventoryState::COUNTED.to_vec()
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            counted_states: default_counted_states(),
        }
    }
}

impl EvaluatorConfig {
    /// Parse a comma-separated state list, e.g. `"confirm,done"`.
    pub fn with_states_list(mut self, list: &str) -> DomainResult<Self> {
        let states = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<InventoryState>())
            .collect::<DomainResult<Vec<InventoryState>>>()?;
        if states.is_empty() {
            return Err(DomainError::validation("counted state list is empty"));
        }
        self.counted_states = states;
        Ok(self)
    }
}
