//! Read-side collaborators the engine queries, plus rule storage for the registry.
//!
//! The engine never owns master data or history. Implementations are supplied by
//! the caller (database adapters in production, [`InMemorySnapshot`] in tests).

pub mod in_memory;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::CycleCountResult;
use crate::history::{InventoryRecord, InventoryState, MovementRecord};
use crate::ids::{LocationId, RuleId, WarehouseId};
use crate::location::Location;
use crate::rule::Rule;

pub use in_memory::{InMemoryRuleRepository, InMemorySnapshot};

/// Physical count history.
pub trait HistoryRepository: Send + Sync {
    /// Most recent record (by date) covering any of `location_ids` whose state
    /// is one of `states`.
    fn find_latest_by_location(
        &self,
        location_ids: &[LocationId],
        states: &[InventoryState],
    ) -> CycleCountResult<Option<InventoryRecord>>;

    /// Every record covering any of `location_ids` whose state is one of
    /// `states` (batched form).
    fn find_by_locations(
        &self,
        location_ids: &[LocationId],
        states: &[InventoryState],
    ) -> CycleCountResult<Vec<InventoryRecord>>;
}

/// Stock movement history.
pub trait MovementRepository: Send + Sync {
    /// Done movements with `location` as source or destination, dated strictly
    /// after `after`.
    fn find_done_after(
        &self,
        location: LocationId,
        after: DateTime<Utc>,
    ) -> CycleCountResult<Vec<MovementRecord>>;
}

/// Location master data.
pub trait LocationRepository: Send + Sync {
    fn get(&self, id: LocationId) -> CycleCountResult<Option<Location>>;
    fn list(&self) -> CycleCountResult<Vec<Location>>;
}

/// Rule storage backing the registry's cross-record checks.
pub trait RuleRepository: Send + Sync {
    fn get(&self, id: RuleId) -> CycleCountResult<Option<Rule>>;
    fn list(&self) -> CycleCountResult<Vec<Rule>>;
    fn save(&self, rule: Rule) -> CycleCountResult<()>;
    /// Zero-confirmation rules whose warehouse set contains `warehouse`, or,
    /// for `None`, whose warehouse set is empty.
    fn zero_rules_for(&self, warehouse: Option<WarehouseId>) -> CycleCountResult<Vec<RuleId>>;
}

impl<T> HistoryRepository for Arc<T>
where
    T: HistoryRepository + ?Sized,
{
    fn find_latest_by_location(
        &self,
        location_ids: &[LocationId],
        states: &[InventoryState],
    ) -> CycleCountResult<Option<InventoryRecord>> {
        (**self).find_latest_by_location(location_ids, states)
    }

    fn find_by_locations(
        &self,
        location_ids: &[LocationId],
        states: &[InventoryState],
    ) -> CycleCountResult<Vec<InventoryRecord>> {
        (**self).find_by_locations(location_ids, states)
    }
}

impl<T> MovementRepository for Arc<T>
where
    T: MovementRepository + ?Sized,
{
    fn find_done_after(
        &self,
        location: LocationId,
        after: DateTime<Utc>,
    ) -> CycleCountResult<Vec<MovementRecord>> {
        (**self).find_done_after(location, after)
    }
}

impl<T> LocationRepository for Arc<T>
where
    T: LocationRepository + ?Sized,
{
    fn get(&self, id: LocationId) -> CycleCountResult<Option<Location>> {
        (**self).get(id)
    }

    fn list(&self) -> CycleCountResult<Vec<Location>> {
        (**self).list()
    }
}

impl<T> RuleRepository for Arc<T>
where
    T: RuleRepository + ?Sized,
{
    fn get(&self, id: RuleId) -> CycleCountResult<Option<Rule>> {
        (**self).get(id)
    }

    fn list(&self) -> CycleCountResult<Vec<Rule>> {
        (**self).list()
    }

    fn save(&self, rule: Rule) -> CycleCountResult<()> {
        (**self).save(rule)
    }

    fn zero_rules_for(&self, warehouse: Option<WarehouseId>) -> CycleCountResult<Vec<RuleId>> {
        (**self).zero_rules_for(warehouse)
    }
}
