//! Shared fixtures for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use cyclecount_core::EntityId;

use crate::history::{InventoryRecord, InventoryState, MovementRecord, MovementState};
use crate::ids::{InventoryId, LocationId, MovementId, RuleId, WarehouseId};
use crate::location::Location;
use crate::repository::InMemorySnapshot;
use crate::rule::{Rule, RuleDraft};

pub fn uid(n: u128) -> EntityId {
    EntityId::from_uuid(uuid::Uuid::from_u128(n))
}

pub fn rule_id(n: u128) -> RuleId {
    RuleId::new(uid(n))
}

pub fn wh(n: u128) -> WarehouseId {
    WarehouseId::new(uid(1_000 + n))
}

pub fn loc_id(n: u128) -> LocationId {
    LocationId::new(uid(2_000 + n))
}

pub fn location(n: u128, accuracy: Decimal) -> Location {
    Location::new(loc_id(n), Some(wh(1)), accuracy)
}

/// Noon UTC on the given day of March 2024.
pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
}

pub fn count(
    date: DateTime<Utc>,
    locations: &[LocationId],
    state: InventoryState,
) -> InventoryRecord {
    InventoryRecord {
        id: InventoryId::generate(),
        date,
        locations: locations.to_vec(),
        state,
    }
}

pub fn done_move(
    date: DateTime<Utc>,
    source: LocationId,
    destination: LocationId,
    quantity: i64,
    unit_price: Decimal,
) -> MovementRecord {
    MovementRecord {
        id: MovementId::generate(),
        date,
        source,
        destination,
        quantity: Decimal::from(quantity),
        unit_price,
        state: MovementState::Done,
    }
}

/// Build a rule without validating it.
pub fn rule(n: u128, draft: RuleDraft) -> Rule {
    Rule::from_draft(rule_id(n), draft, &InMemorySnapshot::new()).unwrap()
}

pub fn ctx(
    snapshot: &InMemorySnapshot,
    now: DateTime<Utc>,
) -> crate::strategy::EvaluationContext<'_> {
    crate::strategy::EvaluationContext {
        history: snapshot,
        movements: snapshot,
        counted_states: &InventoryState::COUNTED,
        now,
    }
}
