use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CycleCountError, CycleCountResult};
use crate::history::{InventoryRecord, InventoryState, MovementRecord, MovementState};
use crate::ids::{LocationId, RuleId, WarehouseId};
use crate::location::Location;
use crate::rule::{Rule, RuleType};

use super::{HistoryRepository, LocationRepository, MovementRepository, RuleRepository};

/// Read-only data snapshot for tests/dev and for the runner binary.
///
/// Serves locations, count history and movements from plain vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemorySnapshot {
    #[serde(default)]
    locations: Vec<Location>,
    #[serde(default)]
    inventories: Vec<InventoryRecord>,
    #[serde(default)]
    movements: Vec<MovementRecord>,
}

impl InMemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_inventory(mut self, record: InventoryRecord) -> Self {
        self.inventories.push(record);
        self
    }

    pub fn with_movement(mut self, movement: MovementRecord) -> Self {
        self.movements.push(movement);
        self
    }

    fn matching<'a>(
        &'a self,
        location_ids: &'a [LocationId],
        states: &'a [InventoryState],
    ) -> impl Iterator<Item = &'a InventoryRecord> + 'a {
        self.inventories.iter().filter(move |r| {
            states.contains(&r.state) && location_ids.iter().any(|id| r.covers(*id))
        })
    }
}

impl HistoryRepository for InMemorySnapshot {
    fn find_latest_by_location(
        &self,
        location_ids: &[LocationId],
        states: &[InventoryState],
    ) -> CycleCountResult<Option<InventoryRecord>> {
        Ok(self
            .matching(location_ids, states)
            .max_by_key(|r| r.date)
            .cloned())
    }

    fn find_by_locations(
        &self,
        location_ids: &[LocationId],
        states: &[InventoryState],
    ) -> CycleCountResult<Vec<InventoryRecord>> {
        Ok(self.matching(location_ids, states).cloned().collect())
    }
}

impl MovementRepository for InMemorySnapshot {
    fn find_done_after(
        &self,
        location: LocationId,
        after: DateTime<Utc>,
    ) -> CycleCountResult<Vec<MovementRecord>> {
        Ok(self
            .movements
            .iter()
            .filter(|m| m.state == MovementState::Done && m.date > after && m.touches(location))
            .cloned()
            .collect())
    }
}

impl LocationRepository for InMemorySnapshot {
    fn get(&self, id: LocationId) -> CycleCountResult<Option<Location>> {
        Ok(self.locations.iter().find(|l| l.id == id).cloned())
    }

    fn list(&self) -> CycleCountResult<Vec<Location>> {
        Ok(self.locations.clone())
    }
}

/// In-memory rule store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRuleRepository {
    inner: RwLock<BTreeMap<RuleId, Rule>>,
}

impl InMemoryRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E>(_: E) -> CycleCountError {
    CycleCountError::repository("rule store lock poisoned")
}

impl RuleRepository for InMemoryRuleRepository {
    fn get(&self, id: RuleId) -> CycleCountResult<Option<Rule>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn list(&self) -> CycleCountResult<Vec<Rule>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }

    fn save(&self, rule: Rule) -> CycleCountResult<()> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(rule.id_typed(), rule);
        Ok(())
    }

    fn zero_rules_for(&self, warehouse: Option<WarehouseId>) -> CycleCountResult<Vec<RuleId>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map
            .values()
            .filter(|r| r.rule_type() == RuleType::Zero)
            .filter(|r| match warehouse {
                Some(wh) => r.scope().warehouses().contains(&wh),
                None => r.scope().warehouses().is_empty(),
            })
            .map(Rule::id_typed)
            .collect())
    }
}
