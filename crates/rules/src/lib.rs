//! Cycle count rule engine.
//!
//! Decides, for a set of stock locations, whether and when the next physical
//! count should happen. Pure decision logic over caller-supplied snapshots:
//! nothing here executes counts, persists proposals or schedules jobs.

pub mod clock;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod ids;
pub mod location;
pub mod proposal;
pub mod registry;
pub mod repository;
pub mod rule;
pub mod strategy;

#[cfg(test)]
mod test_support;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EvaluatorConfig;
pub use error::{CycleCountError, CycleCountResult};
pub use evaluator::RuleEvaluator;
pub use history::{InventoryRecord, InventoryState, MovementRecord, MovementState};
pub use ids::{InventoryId, LocationId, MovementId, RuleId, WarehouseId};
pub use location::Location;
pub use proposal::{Proposal, propose};
pub use registry::RuleRegistry;
pub use repository::{
    HistoryRepository, InMemoryRuleRepository, InMemorySnapshot, LocationRepository,
    MovementRepository, RuleRepository,
};
pub use rule::{Rule, RuleDraft, RuleParams, RuleScope, RuleType, ScopeMode, describe_rule_type};
pub use strategy::{
    AccuracyStrategy, CountStrategy, EvaluationContext, PeriodicStrategy, TurnoverStrategy,
};
