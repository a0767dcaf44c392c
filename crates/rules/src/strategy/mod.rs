//! Count scheduling strategies, one per automatable rule type.

pub mod accuracy;
pub mod periodic;
pub mod turnover;

use chrono::{DateTime, Utc};

use crate::error::CycleCountResult;
use crate::history::InventoryState;
use crate::location::Location;
use crate::proposal::Proposal;
use crate::repository::{HistoryRepository, MovementRepository};
use crate::rule::Rule;

pub use accuracy::AccuracyStrategy;
pub use periodic::PeriodicStrategy;
pub use turnover::TurnoverStrategy;

/// Everything a strategy may read during one evaluation call.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub history: &'a dyn HistoryRepository,
    pub movements: &'a dyn MovementRepository,
    pub counted_states: &'a [InventoryState],
    /// Evaluation time; proposals are never dated before it.
    pub now: DateTime<Utc>,
}

/// A rule type's decision procedure.
///
/// Strategies must not mutate anything: the same rule, locations and context
/// always yield the same proposals, in location order.
pub trait CountStrategy {
    /// Stable strategy name for logs.
    fn name(&self) -> &'static str;

    fn propose(
        &self,
        rule: &Rule,
        locations: &[Location],
        ctx: &EvaluationContext<'_>,
    ) -> CycleCountResult<Vec<Proposal>>;
}
